/*
 * Responsibility
 * - Config → collaborators (verifier, message store) → Router
 * - Middleware layering (security headers / CORS / request id, trace, limits)
 * - axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::identity::FirebaseVerifier;
use crate::state::AppState;
use crate::{api, db, middleware};

fn init_tracing() {
    // RUST_LOG wins when set, e.g. RUST_LOG=info,portal_backend=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly; production: default hook, keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting portal backend in {:?} mode on {} (db startup policy: {:?})",
        config.app_env,
        config.addr,
        config.db_startup_policy
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let verifier =
        FirebaseVerifier::from_config(config).context("building identity verifier")?;
    tracing::info!(project_id = verifier.project_id(), "identity verifier ready");

    let messages = db::connect(config).await?;

    Ok(AppState::new(Arc::new(verifier), Arc::new(messages)))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
