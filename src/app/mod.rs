//! Startup and the two run modes

pub mod init;
pub mod runner;

pub use init::{init_logging, load_config, parse_log_level};
pub use runner::{run_probe, run_pull, run_pull_at};
