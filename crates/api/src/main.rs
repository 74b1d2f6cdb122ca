//! Loan Approval Service - Main Entry Point

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("=== Loan Approval Service v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(config).await
}
