//! Thistle Pull - full pull entry point
//!
//! Pulls every live London kids event in the next 12 months, one page per
//! minute, into datathistle-kids-london-full.json.
//! Config files: thistle-pull.toml, thistle-pull.yaml, config.toml

use anyhow::Result;
use thistle_pull::app::{init_logging, load_config, run_pull};
use thistle_pull::VERSION;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    init_logging(config.log_level.as_deref().unwrap_or("info"));
    info!("Starting Thistle Pull v{}", VERSION);

    if let Err(e) = run_pull(&config).await {
        error!("Pull failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
