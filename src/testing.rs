//! In-process fakes for the two collaborators, used by router tests.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::repos::{
    MessageStore,
    error::{RepoError, RepoResult},
    message_repo::{MessageRow, NewMessage},
};
use crate::services::identity::{IdentityVerifier, VerifiedIdentity, VerifyError};

/// Accepts exactly the tokens it was given.
#[derive(Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
    calls: AtomicUsize,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, uid: &str, email: Option<&str>) -> Self {
        let mut claims = serde_json::Map::new();
        claims.insert("aud".into(), "portal-test".into());
        self.tokens.insert(
            token.to_string(),
            VerifiedIdentity {
                uid: uid.to_string(),
                email: email.map(str::to_string),
                email_verified: email.is_some(),
                claims,
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| VerifyError::UnknownKey("static".to_string()))
    }
}

/// Never answers, like an identity provider that stopped responding.
pub struct HangingVerifier;

#[async_trait]
impl IdentityVerifier for HangingVerifier {
    async fn verify(&self, _token: &str) -> Result<VerifiedIdentity, VerifyError> {
        std::future::pending().await
    }
}

#[derive(Default)]
pub struct MemoryMessageStore {
    rows: Mutex<Vec<MessageRow>>,
    failing: bool,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every insert fails, as if the database were down.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<MessageRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, message: NewMessage) -> RepoResult<MessageRow> {
        if self.failing {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        let row = message.into_row();
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}
