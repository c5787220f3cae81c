//! Auth0 adapter configuration.

use crate::error::{Auth0Error, Auth0Result};
use std::fmt;

/// Scopes appended to every authorization request, after any caller-supplied scopes.
pub const REQUIRED_SCOPES: [&str; 2] = ["openid", "profile"];

pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Optional settings accepted by [`Auth0Config::new`].
#[derive(Debug, Clone)]
pub struct Auth0Options {
    /// Extra scopes requested in front of [`REQUIRED_SCOPES`]
    pub scope: Vec<String>,
    pub http_timeout_seconds: u64,
}

impl Default for Auth0Options {
    fn default() -> Self {
        Self {
            scope: Vec::new(),
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl Auth0Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// Request timeout; `0` is rejected when the provider is built.
    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }
}

/// Immutable Auth0 application settings.
///
/// Endpoints are derived from the domain by plain concatenation; the domain is not
/// validated, so a malformed value only surfaces when a request is made.
#[derive(Clone)]
pub struct Auth0Config {
    domain: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
    http_timeout_seconds: u64,
}

impl Auth0Config {
    pub fn new(
        domain: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
        options: Option<Auth0Options>,
    ) -> Self {
        let options = options.unwrap_or_default();
        let scopes = options
            .scope
            .into_iter()
            .chain(REQUIRED_SCOPES.iter().map(|s| s.to_string()))
            .collect();

        Self {
            domain: domain.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            scopes,
            http_timeout_seconds: options.http_timeout_seconds,
        }
    }

    /// Load settings from `AUTH0_DOMAIN`, `AUTH0_CLIENT_ID`, `AUTH0_CLIENT_SECRET`,
    /// `AUTH0_REDIRECT_URI` and the optional space-separated `AUTH0_SCOPES`.
    pub fn from_env() -> Auth0Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Auth0Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Auth0Error::ConfigError(format!("{} is not set", key)))
        };

        let domain = required("AUTH0_DOMAIN")?;
        let client_id = required("AUTH0_CLIENT_ID")?;
        let client_secret = required("AUTH0_CLIENT_SECRET")?;
        let redirect_uri = required("AUTH0_REDIRECT_URI")?;

        let mut options = Auth0Options::new();
        if let Some(scopes) = lookup("AUTH0_SCOPES") {
            options = options.with_scope(scopes.split_whitespace());
        }
        if let Some(timeout) = lookup("AUTH0_HTTP_TIMEOUT_SECONDS") {
            let seconds = timeout
                .parse::<u64>()
                .ok()
                .filter(|seconds| *seconds > 0)
                .ok_or_else(|| {
                    Auth0Error::ConfigError(format!(
                        "AUTH0_HTTP_TIMEOUT_SECONDS must be a positive number of seconds, got '{}'",
                        timeout
                    ))
                })?;
            options = options.with_http_timeout(seconds);
        }

        Ok(Self::new(
            domain,
            client_id,
            client_secret,
            redirect_uri,
            Some(options),
        ))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Caller scopes followed by [`REQUIRED_SCOPES`], duplicates kept.
    pub fn effective_scopes(&self) -> &[String] {
        &self.scopes
    }

    pub fn http_timeout_seconds(&self) -> u64 {
        self.http_timeout_seconds
    }

    pub fn authorize_endpoint(&self) -> String {
        format!("{}/authorize", self.domain)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/token", self.domain)
    }

    pub fn userinfo_endpoint(&self) -> String {
        format!("{}/userinfo", self.domain)
    }
}

impl fmt::Debug for Auth0Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth0Config")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}
