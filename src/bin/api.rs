//! Tabula API Server
//!
//! Run with: cargo run --bin tabula-api
//!
//! # Configuration
//!
//! Settings come from `TABULA_CONFIG`, `~/.config/tabula/config.toml`,
//! `/etc/tabula/config.toml` or `./config.toml`, in that order, with
//! environment overrides:
//! - `TABULA_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `TABULA_API_PORT`: Port to listen on (default: 8501)
//! - `TABULA_PREVIEW_ROWS`: Rows in the head preview (default: 10)
//! - `TABULA_MAX_SESSIONS`: Live session cap (default: 1000)
//! - `TABULA_LOG_LEVEL` / `TABULA_LOG_FORMAT`: Logging (default: info / pretty)
//! - `RUST_LOG`: Full tracing filter, wins over `TABULA_LOG_LEVEL`

use anyhow::Context;
use tabula::api::{serve, AppState};
use tabula::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let discovery = Config::discover();
    discovery.config.logging.init_tracing();
    discovery.log();
    let config = discovery.config;

    tracing::info!("Starting Tabula API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        preview_rows = config.pane.preview_rows,
        max_sessions = config.sessions.max_sessions,
        idle_timeout_secs = config.sessions.idle_timeout_secs,
        max_upload_bytes = config.api.max_upload_bytes,
        "Pane configuration"
    );

    let state = AppState::new(
        config.api.clone(),
        config.pane.clone(),
        config.sessions.clone(),
    );

    serve(state, &config.api)
        .await
        .with_context(|| format!("serving on {}", config.api.addr()))?;

    tracing::info!("Tabula API server stopped");
    Ok(())
}
