/*
 * Responsibility
 * - POST /upload-message: persist one message for the authenticated user
 * - Reachable only behind the auth gate; the email comes from AuthCtx, never the body
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    api::{
        dto::messages::{UploadMessageRequest, UploadMessageResponse},
        extractors::AuthCtxExtractor,
    },
    error::{AppError, AuthFailure},
    repos::message_repo::NewMessage,
    state::AppState,
};

pub async fn upload_message(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    body: Result<Json<UploadMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadMessageResponse>), AppError> {
    let Some(email) = auth.email else {
        tracing::warn!(uid = %auth.uid, "verified identity carries no email");
        return Err(AppError::Unauthenticated(AuthFailure::MissingEmail));
    };

    let Json(req) = body?;

    let message = NewMessage {
        email,
        content: req.content,
        mood: req.mood,
        timestamp: Utc::now(),
    };

    let row = state.messages.insert(message).await.map_err(|err| {
        tracing::error!(
            error = %err,
            backend = state.messages.backend_name(),
            "message insert failed"
        );
        AppError::from(err)
    })?;

    tracing::info!(
        message_id = %row.id,
        uid = %auth.uid,
        email_verified = auth.email_verified,
        "message stored"
    );

    Ok((StatusCode::OK, Json(UploadMessageResponse { success: true })))
}
