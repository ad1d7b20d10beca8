//! Database bootstrap under an explicit startup policy.
//!
//! - `FailFast`: an unreachable database aborts startup.
//! - `Degrade`: the failure is logged, the server starts with a lazy pool and
//!   uploads answer 500 until the database comes back.

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;

use crate::config::{Config, DbStartupPolicy};
use crate::repos::{PgMessageStore, error::RepoError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unreachable at startup: {0}")]
    DatabaseUnreachable(#[source] sqlx::Error),
    #[error("failed to prepare schema: {0}")]
    Schema(#[source] RepoError),
    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[source] sqlx::Error),
}

fn pool_options(config: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_seconds))
}

/// Open the pool and prepare the schema according to `config.db_startup_policy`.
pub async fn connect(config: &Config) -> Result<PgMessageStore, StartupError> {
    let eager = pool_options(config).connect(&config.database_url).await;

    let pool = match (eager, config.db_startup_policy) {
        (Ok(pool), _) => pool,
        (Err(err), DbStartupPolicy::FailFast) => {
            tracing::error!(error = %err, "database connection failed, aborting startup");
            return Err(StartupError::DatabaseUnreachable(err));
        }
        (Err(err), DbStartupPolicy::Degrade) => {
            tracing::error!(
                error = %err,
                "database connection failed, starting in degraded mode"
            );
            return lazy_pool(config).map(PgMessageStore::new);
        }
    };

    let store = PgMessageStore::new(pool);
    if let Err(err) = store.ensure_schema().await {
        match config.db_startup_policy {
            DbStartupPolicy::FailFast => return Err(StartupError::Schema(err)),
            DbStartupPolicy::Degrade => {
                tracing::error!(error = %err, "schema preparation failed, continuing");
            }
        }
    } else {
        tracing::info!("connected to database");
    }

    Ok(store)
}

fn lazy_pool(config: &Config) -> Result<PgPool, StartupError> {
    pool_options(config)
        .connect_lazy(&config.database_url)
        .map_err(StartupError::InvalidDatabaseUrl)
}
