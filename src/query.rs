//! Query parameter construction for the events endpoint

use chrono::{DateTime, Months, Utc};
use reqwest::Url;

use crate::config::QueryConfig;

/// Fixed filter set for one run. Only the page number varies between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub limit: u32,
    pub status: String,
    pub town: String,
    pub tags: String,
    pub min_date: DateTime<Utc>,
    pub max_date: DateTime<Utc>,
}

impl QueryParams {
    /// Filters with an explicit date window
    pub fn for_window(
        config: &QueryConfig,
        min_date: DateTime<Utc>,
        max_date: DateTime<Utc>,
    ) -> Self {
        Self {
            limit: config.limit,
            status: config.status.clone(),
            town: config.town.clone(),
            tags: config.tags.clone(),
            min_date,
            max_date,
        }
    }

    /// Filters covering `now` through `now + window_months`
    pub fn rolling(config: &QueryConfig, now: DateTime<Utc>) -> Self {
        let max_date = now
            .checked_add_months(Months::new(config.window_months))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::for_window(config, now, max_date)
    }

    /// Query pairs for `page`, in the order the API documents them
    pub fn to_pairs(&self, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("status", self.status.clone()),
            ("town", self.town.clone()),
            ("tags", self.tags.clone()),
            ("min_date", format_iso_timestamp(&self.min_date)),
            ("max_date", format_iso_timestamp(&self.max_date)),
            ("page", page.to_string()),
        ]
    }

    /// Full request URL for `page`
    pub fn page_url(&self, base_url: &str, page: u32) -> Result<Url, String> {
        Url::parse_with_params(base_url, self.to_pairs(page)).map_err(|e| e.to_string())
    }
}

/// ISO-8601 UTC at whole-second precision with a literal `Z` (no milliseconds)
pub fn format_iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
