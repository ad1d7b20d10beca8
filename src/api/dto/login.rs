/*
 * Responsibility
 * - Request/response DTOs of the identity exchange (POST /api/firebase-login)
 */
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct FirebaseLoginRequest {
    // Kept loose: an absent or non-string token is an invalid token (401), not a bad body.
    #[serde(default)]
    pub token: Option<serde_json::Value>,
}

impl FirebaseLoginRequest {
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct FirebaseLoginResponse {
    pub uid: String,
    pub email: Option<String>,
    pub message: &'static str,
}
