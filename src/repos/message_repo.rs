/*
 * Responsibility
 * - Append-only `messages` table (insert only, no update/delete path)
 * - MessageStore trait so handlers do not depend on PgPool directly
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct MessageRow {
    pub id: Uuid,
    pub email: String,
    pub content: String,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

/// A message ready to be stored. The timestamp is taken by the caller so it
/// reflects the moment the request was processed.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub email: String,
    pub content: String,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

impl NewMessage {
    pub fn into_row(self) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            email: self.email,
            content: self.content,
            mood: self.mood,
            timestamp: self.timestamp,
        }
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn insert(&self, message: NewMessage) -> RepoResult<MessageRow>;
}

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL,
    content TEXT NOT NULL,
    mood TEXT NOT NULL,
    "timestamp" TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

#[derive(Debug)]
pub struct PgMessageStore {
    pool: PgPool,
    // set once the table is known to exist
    schema: OnceCell<()>,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Create the table if needed. Retried on the next call after a failure, so a
    /// store built while the database was down prepares itself on first insert.
    pub async fn ensure_schema(&self) -> RepoResult<()> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(SCHEMA).execute(&self.pool).await.map(|_| ())
            })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, message: NewMessage) -> RepoResult<MessageRow> {
        self.ensure_schema().await?;
        let row = message.into_row();

        let stored = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, email, content, mood, "timestamp")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, content, mood, "timestamp"
            "#,
        )
        .bind(row.id)
        .bind(&row.email)
        .bind(&row.content)
        .bind(&row.mood)
        .bind(row.timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }
}
