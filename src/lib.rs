//! Thistle Pull - DataThistle events puller
//!
//! Features:
//! - Sequential pagination with a fixed pause after every full page
//! - Bearer-token auth, 429/401 aware stop handling
//! - Single pretty-printed JSON output written at the end of a run
//! - Single page probe for smoke testing a token and filter set

pub mod api;
pub mod app;
pub mod config;
pub mod fetcher;
pub mod output;
pub mod query;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiError, Event, EventPage, EventSource, EventsApiClient};
pub use config::{ApiConfig, Config, ConfigError, ProbeConfig, PullConfig, QueryConfig};
pub use fetcher::{FetchPolicy, PaginatedFetcher, RunReport, StopReason};
pub use output::{read_events, write_events, OutputError};
pub use query::{format_iso_timestamp, QueryParams};
pub use utils::Throttle;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThistleError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
