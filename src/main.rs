/*
 * Responsibility
 * - start the tokio runtime
 * - call app::run() (no logic here)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod db;
mod error;
mod middleware;
mod repos;
mod services;
mod state;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
