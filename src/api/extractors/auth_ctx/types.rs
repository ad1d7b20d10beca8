/*
 * Responsibility
 * - The authenticated context a handler sees
 * - The gate verifies the token and stores this in request extensions;
 *   handlers only ever receive this type
 */
use crate::services::identity::VerifiedIdentity;

/// Context attached to a request whose bearer token passed verification.
///
/// - `uid` is the identity provider's subject id
/// - `email` may be absent (phone / anonymous sign-in)
/// - `claims` holds the remaining verified claims, read-only
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCtx {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub claims: serde_json::Map<String, serde_json::Value>,
}

impl From<VerifiedIdentity> for AuthCtx {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            email_verified: identity.email_verified,
            claims: identity.claims,
        }
    }
}
