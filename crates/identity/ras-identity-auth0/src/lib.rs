//! Auth0 provider adapter for the OAuth2 Authorization Code flow.
//!
//! [`Auth0Provider`] builds authorization URLs against `{domain}/authorize`, exchanges and
//! refreshes tokens at `{domain}/token`, and reads the OpenID Connect profile from
//! `{domain}/userinfo`. Protocol mechanics live behind the [`OAuth2Client`] trait so the
//! adapter can run against [`HttpOAuth2Client`] or any substitute implementation.

mod client;
mod config;
mod error;
mod pkce;
mod provider;
mod types;


pub use client::{HttpOAuth2Client, OAuth2Client, TokenRequestCredentials};
pub use config::{Auth0Config, Auth0Options, DEFAULT_HTTP_TIMEOUT_SECONDS, REQUIRED_SCOPES};
pub use error::{Auth0Error, Auth0Result};
pub use pkce::{PkceChallenge, generate_state};
pub use provider::Auth0Provider;
pub use types::{AuthorizationRequest, TokenResponseBody, TokenSet, UserProfile};
