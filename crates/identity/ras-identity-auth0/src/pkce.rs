//! PKCE and state helpers.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, thread_rng};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// PKCE code challenge and verifier
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    pub code_verifier: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
}

impl Default for PkceChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl PkceChallenge {
    /// Generate a new S256 challenge from a random verifier
    pub fn new() -> Self {
        let mut rng = thread_rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.r#gen::<u8>()).collect();
        Self::from_verifier(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Rebuild the challenge for a verifier the caller persisted earlier
    pub fn from_verifier(code_verifier: impl Into<String>) -> Self {
        let code_verifier = code_verifier.into();
        let code_challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()));

        Self {
            code_verifier,
            code_challenge,
            code_challenge_method: "S256".to_string(),
        }
    }
}

/// Fresh opaque state value for callers that do not bring their own.
pub fn generate_state() -> String {
    Uuid::new_v4().to_string()
}
