//! Application initialization
//! Handles .env loading, config loading and logging setup

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};

/// Initialize logging. `RUST_LOG` directives, when set, take precedence
/// over the configured level.
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level_filter(log_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Parse log level string
pub fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn default_level_filter(level: &str) -> LevelFilter {
    LevelFilter::from_level(parse_log_level(level))
}

/// Build the run configuration: `.env`, then an optional config file,
/// then environment overrides. Runs before logging is up, so nothing is
/// logged here; validation happens in the runner.
pub fn load_config() -> Result<Config, ConfigError> {
    let _ = dotenvy::dotenv();

    let lookup = |key: &str| std::env::var(key).ok();

    let mut config = match Config::load(lookup) {
        Ok(cfg) => cfg,
        Err(ConfigError::NotFound(_)) => Config::default(),
        Err(e) => return Err(e),
    };

    config.apply_env(lookup);
    Ok(config)
}
