//! Authentication gate: bearer token -> IdentityVerifier -> AuthCtx in extensions.
//!
//! - No / malformed `Authorization` header: 401 "Token missing", verifier not called
//! - Verification failure: 401 "Invalid token", cause logged
//! - Success: AuthCtx inserted, next stage runs
//!
//! The gate never touches the message store.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Put the gate in front of every route of `router`.
///
/// Uses `route_layer`, so unmatched paths still answer 404 rather than 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot extract State, so the state is passed explicitly
    router.route_layer(middleware::from_fn_with_state(state, gate))
}

/// Token carried by `Authorization: Bearer <token>`, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}

async fn gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::debug!("bearer token missing");
        return Err(AppError::token_missing());
    };

    let identity = match state.verifier.verify(token).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::warn!(error = %err, "identity token verification failed");
            return Err(AppError::invalid_token());
        }
    };

    tracing::debug!(uid = %identity.uid, "request authenticated");

    // handed to AuthCtxExtractor
    req.extensions_mut().insert(AuthCtx::from(identity));

    Ok(next.run(req).await)
}
