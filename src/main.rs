// =============================================================================
// Swing Scanner — Main Entry Point
// =============================================================================
//
// Serves the scan API over HTTP. Each POST /scan pulls daily bars from
// Polygon for a fixed set of large-cap equities, flags mean-reversion swing
// setups and appends the result to the on-disk state document.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod indicators;
mod market_data;
mod polygon;
mod runtime_config;
mod scanner;
mod state_store;
mod swing_setup;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::polygon::PolygonClient;
use crate::runtime_config::ScannerConfig;

const CONFIG_PATH: &str = "scanner_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Swing Scanner starting up");

    let mut config = ScannerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScannerConfig::default()
    });
    config.apply_env_overrides();

    info!(
        bind_addr = %config.bind_addr,
        state_path = %config.state_path.display(),
        history_start = %config.history_start,
        universe = ?scanner::UNIVERSE,
        "Configuration resolved"
    );

    // ── 2. Market data client ────────────────────────────────────────────
    let api_key = std::env::var("POLYGON_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        warn!("POLYGON_API_KEY is not set; every symbol fetch will fail and be skipped");
    }
    let polygon = PolygonClient::new(api_key, config.polygon_base_url.clone())?;

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, polygon));

    // ── 4. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        scans_completed = state.scans_completed(),
        "Swing Scanner shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
