/*
 * Responsibility
 * - POST /api/firebase-login: exchange a token for the identity it proves
 * - Same IdentityVerifier as the gate; no persistence, no AuthCtx attached
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::dto::login::{FirebaseLoginRequest, FirebaseLoginResponse},
    error::AppError,
    state::AppState,
};

pub async fn firebase_login(
    State(state): State<AppState>,
    body: Result<Json<FirebaseLoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FirebaseLoginResponse>), AppError> {
    let Json(req) = match body {
        Ok(json) => json,
        // no JSON body means no token to verify
        Err(JsonRejection::MissingJsonContentType(_)) => {
            tracing::warn!("login request without a JSON body");
            return Err(AppError::invalid_token());
        }
        Err(rejection) => return Err(rejection.into()),
    };

    let Some(token) = req.token() else {
        tracing::warn!("login request without a token");
        return Err(AppError::invalid_token());
    };

    let identity = state.verifier.verify(token).await.map_err(|err| {
        tracing::warn!(error = %err, "identity token verification failed");
        AppError::invalid_token()
    })?;

    tracing::info!(uid = %identity.uid, "user authenticated");

    Ok((
        StatusCode::OK,
        Json(FirebaseLoginResponse {
            uid: identity.uid,
            email: identity.email,
            message: "User authenticated",
        }),
    ))
}
