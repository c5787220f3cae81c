//! Generic OAuth2 client used by the Auth0 adapter.

use crate::error::{Auth0Error, Auth0Result};
use crate::types::{AuthorizationRequest, TokenResponseBody};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Confidential client credentials, always sent in the form body of token requests
#[derive(Clone, Copy)]
pub struct TokenRequestCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
}

/// Protocol operations the adapter delegates to.
#[async_trait]
pub trait OAuth2Client: Send + Sync {
    /// Build an authorization-endpoint URL carrying the Authorization Code parameters
    fn create_authorization_url(
        &self,
        authorize_endpoint: &str,
        client_id: &str,
        redirect_uri: &str,
        request: &AuthorizationRequest,
    ) -> Auth0Result<Url>;

    /// Exchange an authorization code at the token endpoint
    async fn validate_authorization_code(
        &self,
        token_endpoint: &str,
        code: &str,
        credentials: TokenRequestCredentials<'_>,
        code_verifier: Option<&str>,
    ) -> Auth0Result<TokenResponseBody>;

    /// Trade a refresh token for a new token set
    async fn refresh_access_token(
        &self,
        token_endpoint: &str,
        refresh_token: &str,
        credentials: TokenRequestCredentials<'_>,
    ) -> Auth0Result<TokenResponseBody>;
}

/// [`OAuth2Client`] backed by `reqwest`
#[derive(Clone)]
pub struct HttpOAuth2Client {
    http_client: Client,
}

impl HttpOAuth2Client {
    pub fn new(http_timeout_seconds: u64) -> Auth0Result<Self> {
        Ok(Self::with_http_client(build_http_client(http_timeout_seconds)?))
    }

    pub fn with_http_client(http_client: Client) -> Self {
        Self { http_client }
    }

    async fn request_tokens(
        &self,
        token_endpoint: &str,
        params: &[(&str, &str)],
    ) -> Auth0Result<TokenResponseBody> {
        let response = self
            .http_client
            .post(token_endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(params)
            .send()
            .await
            .map_err(Auth0Error::TokenRequestFailed)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(Auth0Error::TokenRequestFailed)?;

        if !status.is_success() {
            error!("Token request failed with status {}: {}", status, body);
            return Err(Auth0Error::TokenExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Auth0Error::InvalidTokenResponse(e.to_string()))
    }
}

pub(crate) fn build_http_client(http_timeout_seconds: u64) -> Auth0Result<Client> {
    if http_timeout_seconds == 0 {
        return Err(Auth0Error::ConfigError(
            "HTTP timeout must be at least one second".to_string(),
        ));
    }

    Client::builder()
        .timeout(Duration::from_secs(http_timeout_seconds))
        .build()
        .map_err(|e| Auth0Error::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

#[async_trait]
impl OAuth2Client for HttpOAuth2Client {
    fn create_authorization_url(
        &self,
        authorize_endpoint: &str,
        client_id: &str,
        redirect_uri: &str,
        request: &AuthorizationRequest,
    ) -> Auth0Result<Url> {
        let mut url = Url::parse(authorize_endpoint)?;

        {
            let mut params = url.query_pairs_mut();
            params.append_pair("response_type", "code");
            params.append_pair("client_id", client_id);
            params.append_pair("redirect_uri", redirect_uri);
            params.append_pair("state", &request.state);

            if !request.scopes.is_empty() {
                params.append_pair("scope", &request.scopes.join(" "));
            }

            if let Some(challenge) = &request.code_challenge {
                params.append_pair("code_challenge", challenge);
                params.append_pair(
                    "code_challenge_method",
                    request.code_challenge_method.as_deref().unwrap_or("S256"),
                );
            }
        }

        debug!("Generated authorization URL for {}", authorize_endpoint);
        Ok(url)
    }

    async fn validate_authorization_code(
        &self,
        token_endpoint: &str,
        code: &str,
        credentials: TokenRequestCredentials<'_>,
        code_verifier: Option<&str>,
    ) -> Auth0Result<TokenResponseBody> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri),
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
        ];

        if let Some(verifier) = code_verifier {
            params.push(("code_verifier", verifier));
        }

        self.request_tokens(token_endpoint, &params).await
    }

    async fn refresh_access_token(
        &self,
        token_endpoint: &str,
        refresh_token: &str,
        credentials: TokenRequestCredentials<'_>,
    ) -> Auth0Result<TokenResponseBody> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
        ];

        self.request_tokens(token_endpoint, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CREDENTIALS: TokenRequestCredentials<'static> = TokenRequestCredentials {
        client_id: "test_client_id",
        client_secret: "test_secret",
        redirect_uri: "http://localhost:3000/callback",
    };

    #[test]
    fn test_authorization_url_generation() {
        let client = HttpOAuth2Client::new(30).unwrap();
        let request = AuthorizationRequest {
            scopes: vec!["email".to_string(), "openid".to_string()],
            state: "xyz".to_string(),
            code_challenge: Some("challenge".to_string()),
            code_challenge_method: Some("S256".to_string()),
        };

        let url = client
            .create_authorization_url(
                "https://example.com/authorize",
                "test_client_id",
                "http://localhost:3000/callback",
                &request,
            )
            .unwrap();

        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.path(), "/authorize");

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("response_type"), Some(&"code".into()));
        assert_eq!(params.get("client_id"), Some(&"test_client_id".into()));
        assert_eq!(
            params.get("redirect_uri"),
            Some(&"http://localhost:3000/callback".into())
        );
        assert_eq!(params.get("state"), Some(&"xyz".into()));
        assert_eq!(params.get("scope"), Some(&"email openid".into()));
        assert_eq!(params.get("code_challenge"), Some(&"challenge".into()));
        assert_eq!(params.get("code_challenge_method"), Some(&"S256".into()));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = HttpOAuth2Client::new(0);
        assert!(matches!(result, Err(Auth0Error::ConfigError(_))));
    }

    #[test]
    fn test_authorization_url_without_scopes_or_pkce() {
        let client = HttpOAuth2Client::new(30).unwrap();
        let request = AuthorizationRequest {
            state: "xyz".to_string(),
            ..Default::default()
        };

        let url = client
            .create_authorization_url("https://example.com/authorize", "c", "r", &request)
            .unwrap();

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert!(!params.contains_key("scope"));
        assert!(!params.contains_key("code_challenge"));
    }

    #[test]
    fn test_authorization_url_rejects_relative_endpoint() {
        let client = HttpOAuth2Client::new(30).unwrap();
        let request = AuthorizationRequest::default();

        let result = client.create_authorization_url("tenant.auth0.com/authorize", "c", "r", &request);
        assert!(matches!(result, Err(Auth0Error::UrlError(_))));
    }

    #[tokio::test]
    async fn test_code_exchange_sends_credentials_in_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth_code"))
            .and(body_string_contains("client_secret=test_secret"))
            .and(body_string_contains("code_verifier=verifier"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "a",
                "refresh_token": "r",
                "id_token": "i",
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpOAuth2Client::new(30).unwrap();
        let body = client
            .validate_authorization_code(
                &format!("{}/token", mock_server.uri()),
                "auth_code",
                CREDENTIALS,
                Some("verifier"),
            )
            .await
            .unwrap();

        assert_eq!(body.access_token, "a");
        assert_eq!(body.refresh_token.as_deref(), Some("r"));
        assert_eq!(body.id_token.as_deref(), Some("i"));
    }

    #[tokio::test]
    async fn test_malformed_token_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = HttpOAuth2Client::new(30).unwrap();
        let result = client
            .refresh_access_token(
                &format!("{}/token", mock_server.uri()),
                "refresh",
                CREDENTIALS,
            )
            .await;

        assert!(matches!(result, Err(Auth0Error::InvalidTokenResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint() {
        let client = HttpOAuth2Client::new(1).unwrap();
        let result = client
            .refresh_access_token("http://127.0.0.1:1/token", "refresh", CREDENTIALS)
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, Auth0Error::TokenRequestFailed(_)));
        assert!(err.is_token_exchange());
    }
}
