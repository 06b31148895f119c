//! Entry routines shared by the binaries
//!
//! Both routines validate the configuration before any request is made,
//! so a missing credential never reaches the network.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::{ApiError, EventsApiClient};
use crate::config::Config;
use crate::fetcher::{FetchPolicy, PaginatedFetcher, RunReport, StopReason};
use crate::output::{write_events, OutputError};
use crate::query::QueryParams;
use crate::ThistleError;

/// Validate and log any warnings, returning the bearer token
fn checked_api_key(config: &Config) -> Result<&str, ThistleError> {
    for warning in config.validate()? {
        warn!("⚠️  WARNING: {}", warning);
    }
    Ok(config.api_key()?)
}

/// Pull every page of the configured filter set and persist the result
pub async fn run_pull(config: &Config) -> Result<RunReport, ThistleError> {
    run_pull_at(config, Utc::now()).await
}

/// [`run_pull`] with an explicit start time for the date window
pub async fn run_pull_at(
    config: &Config,
    now: DateTime<Utc>,
) -> Result<RunReport, ThistleError> {
    let api_key = checked_api_key(config)?;
    let params = QueryParams::rolling(&config.query, now);
    let client = EventsApiClient::new(
        config.api.base_url.as_str(),
        api_key,
        params,
        Duration::from_secs(config.pull.timeout_secs),
    )?;

    info!(
        "Starting full safe pull of {} + {} events ({}-second delay between requests)…",
        config.query.town, config.query.tags, config.pull.delay_secs
    );

    let policy = FetchPolicy::full_pull(
        config.query.limit as usize,
        Duration::from_secs(config.pull.delay_secs),
    );
    let report = PaginatedFetcher::new(client, policy).run().await;

    write_events(&config.pull.output_path, &report.events)?;
    info!("Unique event IDs: {}", report.unique_ids());
    info!("{}", report.summary());

    Ok(report)
}

/// Fetch the first page of the probe window and save it.
///
/// A failed fetch is reported in the log and leaves no file behind; only a
/// failed ping (when enabled) or a failed write is returned as an error.
pub async fn run_probe(config: &Config) -> Result<RunReport, ThistleError> {
    let api_key = checked_api_key(config)?;
    let now = Utc::now();
    let params = match (config.probe.min_date, config.probe.max_date) {
        (Some(min), Some(max)) => QueryParams::for_window(&config.query, min, max),
        _ => QueryParams::rolling(&config.query, now),
    };
    let client = EventsApiClient::new(
        config.api.base_url.as_str(),
        api_key,
        params,
        Duration::from_secs(config.probe.timeout_secs),
    )?;

    if config.probe.ping_first {
        info!("Testing authentication with /ping endpoint...");
        if let Err(e) = client.ping().await {
            log_ping_failure(&e);
            return Err(e.into());
        }
        info!("✅ /ping SUCCESS → You are authenticated!");
    }

    info!("Fetching real events...");
    let report = PaginatedFetcher::new(client, FetchPolicy::single_page(config.query.limit as usize))
        .run()
        .await;

    if matches!(
        report.stop,
        StopReason::RateLimited | StopReason::Unauthorized | StopReason::Failed(_)
    ) {
        log_probe_failure(&report.stop);
        return Ok(report);
    }

    info!("✅ SUCCESS! Received {} events", report.events.len());
    match report.events.first() {
        Some(first) => {
            let pretty = serde_json::to_string_pretty(first).map_err(OutputError::from)?;
            info!("📋 First event (pretty printed):\n{}", pretty);
        }
        None => info!("No events in the probe window"),
    }

    write_events(&config.probe.output_path, &report.events)?;
    Ok(report)
}

fn log_ping_failure(err: &ApiError) {
    error!("❌ /ping FAILED");
    match err {
        ApiError::ApiError { status, message } => {
            error!("   Status: {}", status);
            error!("   Body: {}", message);
        }
        other => error!("   {}", other),
    }
    error!("   Most likely causes:");
    error!("   • Wrong or expired API key");
    error!("   • You are not logged in / key revoked");
    error!("   • Network/firewall blocking the request");
}

fn log_probe_failure(stop: &StopReason) {
    error!("❌ Failed to fetch events");
    match stop {
        StopReason::RateLimited => error!("Status: 429 Too Many Requests"),
        StopReason::Unauthorized => error!("Status: 401 Unauthorized"),
        StopReason::Failed(ApiError::ApiError { status, message }) => {
            error!("Status: {}", status);
            error!("Response body: {}", message);
        }
        StopReason::Failed(e) if e.is_connect() => {
            error!("Network error – check your internet connection or firewall");
        }
        StopReason::Failed(e) => error!("{}", e),
        _ => {}
    }
}
