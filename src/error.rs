/*
 * Responsibility
 * - The application-wide AppError
 * - IntoResponse (HTTP status + flat `{ "error": ... }` JSON body)
 * - Conversions from repo / verifier errors at the route boundary
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Why a request was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    TokenMissing,
    InvalidToken,
    MissingEmail,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::TokenMissing => "Token missing",
            AuthFailure::InvalidToken => "Invalid token",
            AuthFailure::MissingEmail => "Token has no email",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthenticated: {}", .0.message())]
    Unauthenticated(AuthFailure),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("storage failure")]
    StorageFailure,
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn token_missing() -> Self {
        Self::Unauthenticated(AuthFailure::TokenMissing)
    }

    pub fn invalid_token() -> Self {
        Self::Unauthenticated(AuthFailure::InvalidToken)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::StorageFailure | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            AppError::Unauthenticated(reason) => reason.message().to_string(),
            AppError::BadRequest(message) => message,
            AppError::StorageFailure => "DB insert failed".to_string(),
            AppError::Timeout => "Request timed out".to_string(),
            AppError::Internal => "internal server error".to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Db(_) => AppError::StorageFailure,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}
