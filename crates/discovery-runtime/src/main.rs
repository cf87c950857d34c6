//! # Overlay Discovery Runtime
//!
//! The main entry point for the SHIP/SLAP discovery process.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment (`OD_PROTOCOLS`,
//!    `OD_BUS_CAPACITY`, `OD_LOG`)
//! 2. Install logging with the configured filter
//! 3. Build and start the runtime
//! 4. Run until Ctrl+C, then shut down gracefully

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use discovery_runtime::{load_config, DiscoveryRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration errors surface before logging exists
    let config = load_config().context("Failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("Invalid log filter {:?}", config.logging.filter))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    let runtime = DiscoveryRuntime::new(config)?;
    runtime.start().await?;

    info!("Discovery runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    Ok(())
}
