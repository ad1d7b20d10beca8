/*
 * Responsibility
 * - URL layout of the service
 * - Which routes sit behind the auth gate (route_layer on the protected group only)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{health::health, login::firebase_login, messages::upload_message};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/upload-message", post(upload_message));
    let protected = middleware::auth::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/api/firebase-login", post(firebase_login))
        .merge(protected)
}
