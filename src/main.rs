// =============================================================================
// ADX Sheet Engine -- Main Entry Point
// =============================================================================
//
// A small HTTP service around one deterministic computation: upload a daily
// OHLC CSV, get back the reference spreadsheet's ADX worksheet (TR, +-DM,
// Wilder-smoothed columns, DI/DX/ADX) as a preview and a downloadable CSV.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod indicators;
mod runtime_config;
mod sheet;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("ADX Sheet Engine starting up");

    let mut config = RuntimeConfig::load("runtime_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override the bind address from env if available.
    if let Ok(addr) = std::env::var("ADX_SHEET_BIND_ADDR") {
        let addr = addr.trim();
        if !addr.is_empty() {
            config.bind_addr = addr.to_string();
        }
    }

    info!(
        bind_addr = %config.bind_addr,
        output_precision = config.output_precision,
        preview_rows = config.preview_rows,
        max_stored_sheets = config.max_stored_sheets,
        "Configuration loaded"
    );

    // ── 2. Build shared state & router ───────────────────────────────────
    let state = Arc::new(AppState::new(config));
    let app = api::rest::router(state.clone());

    // ── 3. Serve until shutdown ──────────────────────────────────────────
    let bind_addr = state.runtime_config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("ADX Sheet Engine shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
