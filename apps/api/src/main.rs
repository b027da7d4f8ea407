mod analysis;
mod config;
mod errors;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::engine::ProcessEngine;
use crate::analysis::store::UploadStore;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ats_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the transient upload store; the directory is also
    // re-created lazily on use if something removes it at runtime.
    let store = UploadStore::new(&config.upload_dir);
    store.ensure_dir().await?;
    info!("Upload directory ready at {}", config.upload_dir.display());

    // Initialize the external analysis engine
    let engine = Arc::new(ProcessEngine::from_command(
        &config.engine_command,
        config.engine_timeout_secs.map(Duration::from_secs),
    )?);
    info!(
        "Analysis engine: {} (timeout: {})",
        config.engine_command,
        config
            .engine_timeout_secs
            .map(|s| format!("{s}s"))
            .unwrap_or_else(|| "none".to_string()),
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        store,
        engine,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // dashboard is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
