//! Events endpoint client

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use crate::api::{classify_status, ApiError, Event};
use crate::query::QueryParams;

const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";
const PING_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One page of results
#[derive(Debug, Clone, Default)]
pub struct EventPage {
    pub events: Vec<Event>,
    /// Value of the remaining-quota header, when the API sent one
    pub rate_limit_remaining: Option<String>,
}

impl EventPage {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Source of event pages for the fetch loop
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Request URL for `page`, for progress logs (never contains the token)
    fn page_url(&self, page: u32) -> String;

    /// Fetch a single page
    async fn fetch_page(&self, page: u32) -> Result<EventPage, ApiError>;
}

/// HTTP client for the events endpoint
pub struct EventsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    params: QueryParams,
}

impl EventsApiClient {
    /// Create new client with a per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        params: QueryParams,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            params,
        })
    }

    /// Check the token against /ping, a sibling of the events path
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = ping_url(&self.base_url)?;

        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .timeout(PING_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for EventsApiClient {
    fn page_url(&self, page: u32) -> String {
        self.params
            .page_url(&self.base_url, page)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.base_url.clone())
    }

    async fn fetch_page(&self, page: u32) -> Result<EventPage, ApiError> {
        let url = self
            .params
            .page_url(&self.base_url, page)
            .map_err(ApiError::InvalidUrl)?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }

        let rate_limit_remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await?;
        Ok(EventPage {
            events: parse_events(&body)?,
            rate_limit_remaining,
        })
    }
}

/// `/ping` next to the events path, with or without a trailing slash
fn ping_url(base_url: &str) -> Result<Url, ApiError> {
    Url::parse(base_url.trim_end_matches('/'))
        .and_then(|base| base.join("ping"))
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))
}

/// Decode a page body. An empty body or `null` means no events.
fn parse_events(body: &[u8]) -> Result<Vec<Event>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let events: Option<Vec<Event>> = serde_json::from_slice(body)?;
    Ok(events.unwrap_or_default())
}

/// Scripted event source for tests
#[cfg(test)]
pub struct MockEventSource {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<EventPage, ApiError>>>,
    requested: std::sync::Mutex<Vec<u32>>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queue a page of `count` events with ids starting at `first_id`
    pub fn with_page(self, first_id: usize, count: usize) -> Self {
        let events = (first_id..first_id + count)
            .map(|i| Event(serde_json::json!({ "event_id": format!("ev-{i}") })))
            .collect();
        self.with_response(Ok(EventPage {
            events,
            rate_limit_remaining: None,
        }))
    }

    pub fn with_response(self, response: Result<EventPage, ApiError>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Pages requested so far, in order
    pub fn requested(&self) -> Vec<u32> {
        self.requested.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl EventSource for MockEventSource {
    fn page_url(&self, page: u32) -> String {
        format!("mock://events?page={page}")
    }

    async fn fetch_page(&self, page: u32) -> Result<EventPage, ApiError> {
        self.requested.lock().unwrap().push(page);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(EventPage::default()))
    }
}
