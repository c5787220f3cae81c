//! Auth0 provider adapter.

use crate::client::{
    HttpOAuth2Client, OAuth2Client, TokenRequestCredentials, build_http_client,
};
use crate::config::{Auth0Config, Auth0Options};
use crate::error::{Auth0Error, Auth0Result};
use crate::pkce::PkceChallenge;
use crate::types::{AuthorizationRequest, TokenSet, UserProfile};
use reqwest::Client;
use tracing::{debug, error, info};
use url::Url;

/// Maps the Auth0 login flow onto a generic [`OAuth2Client`].
///
/// Holds no mutable state after construction, so one instance can serve
/// concurrent requests.
#[derive(Clone)]
pub struct Auth0Provider<C = HttpOAuth2Client> {
    config: Auth0Config,
    client: C,
    http_client: Client,
}

impl Auth0Provider<HttpOAuth2Client> {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        options: Option<Auth0Options>,
    ) -> Auth0Result<Self> {
        Self::from_config(Auth0Config::new(
            domain,
            client_id,
            client_secret,
            redirect_uri,
            options,
        ))
    }

    pub fn from_config(config: Auth0Config) -> Auth0Result<Self> {
        let http_client = build_http_client(config.http_timeout_seconds())?;
        let client = HttpOAuth2Client::with_http_client(http_client.clone());

        Ok(Self {
            config,
            client,
            http_client,
        })
    }
}

impl<C: OAuth2Client> Auth0Provider<C> {
    /// Use a caller-supplied OAuth2 client for the authorize and token steps
    pub fn with_client(config: Auth0Config, client: C) -> Auth0Result<Self> {
        let http_client = build_http_client(config.http_timeout_seconds())?;

        Ok(Self {
            config,
            client,
            http_client,
        })
    }

    pub fn config(&self) -> &Auth0Config {
        &self.config
    }

    /// Authorization URL for `state`, which the caller generates and later verifies.
    pub fn build_authorization_url(&self, state: &str) -> Auth0Result<Url> {
        self.authorization_url(state, None)
    }

    /// Same as [`Self::build_authorization_url`] with an S256 PKCE challenge attached.
    /// The caller must keep `pkce.code_verifier` for the code exchange.
    pub fn build_authorization_url_with_pkce(
        &self,
        state: &str,
        pkce: &PkceChallenge,
    ) -> Auth0Result<Url> {
        self.authorization_url(state, Some(pkce))
    }

    fn authorization_url(&self, state: &str, pkce: Option<&PkceChallenge>) -> Auth0Result<Url> {
        let request = AuthorizationRequest {
            scopes: self.config.effective_scopes().to_vec(),
            state: state.to_string(),
            code_challenge: pkce.map(|p| p.code_challenge.clone()),
            code_challenge_method: pkce.map(|p| p.code_challenge_method.clone()),
        };

        self.client.create_authorization_url(
            &self.config.authorize_endpoint(),
            self.config.client_id(),
            self.config.redirect_uri(),
            &request,
        )
    }

    pub async fn exchange_authorization_code(&self, code: &str) -> Auth0Result<TokenSet> {
        self.exchange(code, None).await
    }

    pub async fn exchange_authorization_code_with_verifier(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Auth0Result<TokenSet> {
        self.exchange(code, Some(code_verifier)).await
    }

    async fn exchange(&self, code: &str, code_verifier: Option<&str>) -> Auth0Result<TokenSet> {
        let body = self
            .client
            .validate_authorization_code(
                &self.config.token_endpoint(),
                code,
                self.credentials(),
                code_verifier,
            )
            .await?;

        info!("Exchanged authorization code with {}", self.config.domain());
        Ok(body.into())
    }

    pub async fn refresh_tokens(&self, refresh_token: &str) -> Auth0Result<TokenSet> {
        let body = self
            .client
            .refresh_access_token(
                &self.config.token_endpoint(),
                refresh_token,
                self.credentials(),
            )
            .await?;

        info!("Refreshed tokens with {}", self.config.domain());
        Ok(body.into())
    }

    /// Read the `/userinfo` claims for `access_token`.
    ///
    /// Non-2xx responses fail with [`Auth0Error::UserInfoFailed`] instead of being
    /// parsed as a profile.
    pub async fn fetch_user_profile(&self, access_token: &str) -> Auth0Result<UserProfile> {
        let response = self
            .http_client
            .get(self.config.userinfo_endpoint())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(Auth0Error::UserInfoRequestFailed)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(Auth0Error::UserInfoRequestFailed)?;

        if !status.is_success() {
            error!("User info request failed with status {}: {}", status, body);
            return Err(Auth0Error::UserInfoFailed {
                status: status.as_u16(),
                body,
            });
        }

        let profile: UserProfile = serde_json::from_str(&body)
            .map_err(|e| Auth0Error::InvalidUserInfoResponse(e.to_string()))?;

        debug!("Retrieved user info from {}", self.config.domain());
        Ok(profile)
    }

    fn credentials(&self) -> TokenRequestCredentials<'_> {
        TokenRequestCredentials {
            client_id: self.config.client_id(),
            client_secret: self.config.client_secret(),
            redirect_uri: self.config.redirect_uri(),
        }
    }
}
