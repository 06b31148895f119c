//! Run statistics

use crate::api::{unique_event_ids, ApiError, Event};

/// Why the fetch loop stopped
#[derive(Debug, Default)]
pub enum StopReason {
    /// An empty page came back
    #[default]
    EndOfResults,
    /// A page shorter than the page size came back
    PartialPage,
    /// The policy's page limit was reached
    PageLimit,
    /// HTTP 429
    RateLimited,
    /// HTTP 401
    Unauthorized,
    /// Network failure, unexpected status or undecodable body
    Failed(ApiError),
}

impl StopReason {
    /// Whether every matching record was collected
    pub fn is_complete(&self) -> bool {
        matches!(self, StopReason::EndOfResults | StopReason::PartialPage)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            StopReason::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StopReason::EndOfResults => "end of results",
            StopReason::PartialPage => "last page",
            StopReason::PageLimit => "page limit",
            StopReason::RateLimited => "rate limited",
            StopReason::Unauthorized => "unauthorized",
            StopReason::Failed(_) => "request failed",
        }
    }
}

/// Outcome of one run: the accumulator plus counters
#[derive(Debug, Default)]
pub struct RunReport {
    /// Every record received, in arrival order
    pub events: Vec<Event>,
    /// Requests issued, including the one that ended the run
    pub requests: u32,
    /// Non-empty pages received
    pub pages: u32,
    /// Throttle pauses taken
    pub delays: u32,
    pub stop: StopReason,
}

impl RunReport {
    /// Distinct `event_id` values across all pages
    pub fn unique_ids(&self) -> usize {
        unique_event_ids(&self.events)
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "📊 Run: requests={}, pages={}, events={}, unique_ids={}, delays={}, stop={}",
            self.requests,
            self.pages,
            self.events.len(),
            self.unique_ids(),
            self.delays,
            self.stop.label()
        )
    }
}
