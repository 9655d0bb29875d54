//! gauge — a headless multi-channel system telemetry meter.
//!
//! Run with:  `RUST_LOG=info gauge [path/to/gauge.toml]`

mod app;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("gauge v{} starting", env!("CARGO_PKG_VERSION"));

    app::run().await
}
