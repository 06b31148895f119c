//! Single page probe for checking a token and filter set

use anyhow::Result;
use thistle_pull::app::{init_logging, load_config, run_probe};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    init_logging(config.log_level.as_deref().unwrap_or("info"));
    info!("🚀 Data Thistle API Explorer starting...");

    if let Err(e) = run_probe(&config).await {
        error!("❌ ERROR: {}", e);
        return Err(e.into());
    }

    Ok(())
}
