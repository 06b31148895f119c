//! DataThistle API client
//! Events endpoint plus /ping

pub mod event;
pub mod events;

pub use event::{unique_event_ids, Event};
pub use events::{EventPage, EventSource, EventsApiClient};

#[cfg(test)]
pub use events::MockEventSource;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Rate limited (429)")]
    RateLimited,
    #[error("Unauthorized (401)")]
    Unauthorized,
}

impl ApiError {
    /// Whether the failure happened before any HTTP status was received
    pub fn is_connect(&self) -> bool {
        match self {
            ApiError::HttpError(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::HttpError(_) => "NETWORK",
            ApiError::JsonError(_) => "DECODE",
            ApiError::InvalidUrl(_) => "URL",
            ApiError::ApiError { .. } => "API",
            ApiError::RateLimited => "RATE_LIMIT",
            ApiError::Unauthorized => "AUTH",
        }
    }
}

/// Map a non-success status and body to an error
pub fn classify_status(status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        _ => sanitize_api_error(status.as_u16(), body),
    }
}

/// Truncate very long error bodies before they reach the log
pub fn sanitize_api_error(status: u16, detailed_message: String) -> ApiError {
    let safe_message = if detailed_message.chars().count() > 500 {
        let head: String = detailed_message.chars().take(500).collect();
        format!("{}... (truncated)", head)
    } else {
        detailed_message
    };

    ApiError::ApiError {
        status,
        message: safe_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit_and_auth() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ApiError::RateLimited
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "bad token".to_string()),
            ApiError::Unauthorized
        ));
    }

    #[test]
    fn test_classify_other_status_keeps_body() {
        match classify_status(StatusCode::BAD_GATEWAY, "upstream down".to_string()) {
            ApiError::ApiError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sanitize_truncates_long_body() {
        let body = "x".repeat(800);
        match sanitize_api_error(500, body) {
            ApiError::ApiError { message, .. } => {
                assert!(message.ends_with("... (truncated)"));
                assert_eq!(message.len(), 500 + "... (truncated)".len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_category() {
        assert_eq!(ApiError::RateLimited.category(), "RATE_LIMIT");
        assert_eq!(ApiError::Unauthorized.category(), "AUTH");
    }
}
