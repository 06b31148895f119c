//! Paginated fetch loop
//!
//! Requests pages strictly one at a time, accumulating every record in
//! order. The loop stops on the first empty or short page, on the page
//! limit, or on any request failure. Failures are never retried and never
//! propagate.
//! Whatever was gathered before the stop is returned in the [`RunReport`].

pub mod report;

pub use report::{RunReport, StopReason};

use std::time::Duration;
use tracing::{error, info};

use crate::api::{ApiError, EventSource};
use crate::utils::Throttle;

/// Page limit and delay policy for one run
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Configured page size; a page of exactly this length is "full"
    pub page_size: usize,
    /// Stop after this many non-empty pages
    pub max_pages: Option<u32>,
    /// Pause taken after every full page
    pub throttle: Throttle,
}

impl FetchPolicy {
    /// Every page, pausing `delay` after each full one
    pub fn full_pull(page_size: usize, delay: Duration) -> Self {
        Self {
            page_size,
            max_pages: None,
            throttle: Throttle::new(delay),
        }
    }

    /// First page only
    pub fn single_page(page_size: usize) -> Self {
        Self {
            page_size,
            max_pages: Some(1),
            throttle: Throttle::none(),
        }
    }

    /// A page of exactly `page_size` records; more may follow
    pub fn is_full_page(&self, len: usize) -> bool {
        len == self.page_size
    }
}

/// Sequential page-by-page fetcher
pub struct PaginatedFetcher<S> {
    source: S,
    policy: FetchPolicy,
}

impl<S: EventSource> PaginatedFetcher<S> {
    pub fn new(source: S, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run the loop to one of its stop conditions
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut page: u32 = 1;

        let stop = loop {
            info!(
                "Request #{} → page {} ({})",
                report.requests + 1,
                page,
                self.source.page_url(page)
            );
            report.requests += 1;

            let result = self.source.fetch_page(page).await;
            let page_events = match result {
                Ok(page_events) => page_events,
                Err(e) => break stop_for(e),
            };

            if page_events.is_empty() {
                info!("Empty page received → reached the end of results.");
                break StopReason::EndOfResults;
            }

            let page_len = page_events.len();
            report.events.extend(page_events.events);
            info!("   {} events (total so far: {})", page_len, report.events.len());
            info!(
                "   Rate-limit remaining: {}",
                page_events.rate_limit_remaining.as_deref().unwrap_or("unknown")
            );

            report.pages += 1;
            page += 1;

            if self.policy.max_pages.is_some_and(|max| report.pages >= max) {
                break StopReason::PageLimit;
            }

            if self.policy.is_full_page(page_len) {
                self.policy.throttle.pause().await;
                report.delays += 1;
            } else if page_len < self.policy.page_size {
                info!(
                    "Short page ({} < {}) → reached the end of results.",
                    page_len, self.policy.page_size
                );
                break StopReason::PartialPage;
            }
        };
        report.stop = stop;

        info!("Finished!");
        info!("Total requests made: {}", report.requests);
        info!("Total events collected: {}", report.events.len());
        report
    }
}

/// Turn a request failure into a stop decision, logging why
fn stop_for(err: ApiError) -> StopReason {
    match err {
        ApiError::RateLimited => {
            error!("Rate limited (429). Stopping early.");
            StopReason::RateLimited
        }
        ApiError::Unauthorized => {
            error!("Unauthorized – check your API key.");
            StopReason::Unauthorized
        }
        other => {
            error!("Request failed [{}]: {}", other.category(), other);
            StopReason::Failed(other)
        }
    }
}
