/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - verifier: checks bearer tokens, messages: the append-only message store
 * - Cheap to clone (Arc inside); built once at startup and injected
 */
use std::sync::Arc;

use crate::repos::MessageStore;
use crate::services::identity::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub messages: Arc<dyn MessageStore>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn IdentityVerifier>, messages: Arc<dyn MessageStore>) -> Self {
        Self { verifier, messages }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("messages", &self.messages.backend_name())
            .finish()
    }
}
