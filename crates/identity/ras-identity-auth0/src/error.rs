//! Auth0 adapter error types.

use thiserror::Error;

pub type Auth0Result<T> = Result<T, Auth0Error>;

#[derive(Debug, Error)]
pub enum Auth0Error {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Token request failed: {0}")]
    TokenRequestFailed(#[source] reqwest::Error),

    #[error("Token exchange failed with status {status}: {body}")]
    TokenExchangeFailed { status: u16, body: String },

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("User info request failed: {0}")]
    UserInfoRequestFailed(#[source] reqwest::Error),

    #[error("User info request failed with status {status}: {body}")]
    UserInfoFailed { status: u16, body: String },

    #[error("Invalid user info response: {0}")]
    InvalidUserInfoResponse(String),
}

impl Auth0Error {
    /// True for every failure surfaced while exchanging a code or refreshing tokens.
    pub fn is_token_exchange(&self) -> bool {
        matches!(
            self,
            Self::TokenRequestFailed(_)
                | Self::TokenExchangeFailed { .. }
                | Self::InvalidTokenResponse(_)
        )
    }

    /// True for every failure surfaced while fetching the user profile.
    pub fn is_profile_fetch(&self) -> bool {
        matches!(
            self,
            Self::UserInfoRequestFailed(_)
                | Self::UserInfoFailed { .. }
                | Self::InvalidUserInfoResponse(_)
        )
    }

    /// HTTP status reported by the provider, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TokenExchangeFailed { status, .. } | Self::UserInfoFailed { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
