mod checks;
mod config;
mod routes;

use crate::config::{Settings, DEFAULT_CONFIG_FILE};
use crate::routes::AppState;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,checkchain=debug,tower_http=debug")),
        )
        .init();

    info!("checkchain-server starting...");

    let settings = Settings::load(DEFAULT_CONFIG_FILE)?.with_env()?;
    info!(
        addr = %settings.server.addr(),
        default_message = %settings.validation.default_message,
        "configuration loaded"
    );

    let accounts = Arc::new(RwLock::new(HashSet::from(["admin@example.com".to_string()])));
    let app = routes::router(AppState::new(settings.validation.clone(), accounts));

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
