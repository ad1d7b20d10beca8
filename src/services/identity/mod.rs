//! Identity verification: opaque bearer token -> verified claims.
//!
//! The gate and the login exchange both go through `IdentityVerifier`, so the
//! two paths can never disagree about what a valid token is.

pub mod firebase;
pub mod keys;

use async_trait::async_trait;
use thiserror::Error;

pub use firebase::FirebaseVerifier;

/// Claims of a token that has passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    // Everything else the provider put in the token (iss, aud, auth_time, firebase, ...).
    pub claims: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token header is malformed: {0}")]
    MalformedHeader(#[source] jsonwebtoken::errors::Error),
    #[error("unsupported token alg: {0:?}")]
    UnsupportedAlg(jsonwebtoken::Algorithm),
    #[error("token header has no kid")]
    MissingKeyId,
    #[error("no signing key for kid {0}")]
    UnknownKey(String),
    #[error("token rejected: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
    #[error("'{0}' is in the future")]
    NotYetValid(&'static str),
    #[error("signing keys unavailable: {0}")]
    KeyFetch(#[from] keys::KeyFetchError),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    // Verify the token and return its claims. Any failure means "not authenticated".
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;
}
