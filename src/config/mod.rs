//! Configuration management
//! Supports TOML, YAML, JSON config files with environment overrides

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable holding the bearer token
pub const API_KEY_ENV: &str = "DATATHISTLE_API_KEY";
/// Environment variable overriding the events endpoint
pub const BASE_URL_ENV: &str = "DATATHISTLE_BASE_URL";
/// Environment variable pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "THISTLE_CONFIG";

const DEFAULT_BASE_URL: &str = "https://api.datathistle.com/v1/events";

/// Tokens shorter than this are almost certainly not a JWT
const MIN_EXPECTED_KEY_LEN: usize = 50;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("DATATHISTLE_API_KEY is missing or empty")]
    MissingApiKey,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("No configuration file found. Expected one of: {0:?}")]
    NotFound(Vec<String>),
}

/// Puller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging level
    pub log_level: Option<String>,
    /// Endpoint and credential
    pub api: ApiConfig,
    /// Fixed filter set sent with every request
    pub query: QueryConfig,
    /// Full pull behaviour
    pub pull: PullConfig,
    /// Single page probe behaviour
    pub probe: ProbeConfig,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Events endpoint, e.g. https://api.datathistle.com/v1/events
    pub base_url: String,
    /// Bearer token (JWT)
    pub key: Option<String>,
}

/// Event filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size (default: 20)
    pub limit: u32,
    /// Lifecycle status (default: "live")
    pub status: String,
    /// Locality (default: "London")
    pub town: String,
    /// Category tag, exact match (default: "kids")
    pub tags: String,
    /// Forward window from now in months (default: 12)
    pub window_months: u32,
}

/// Full pull configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PullConfig {
    /// Delay after every full page in seconds (default: 60)
    pub delay_secs: u64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Output file, relative to the working directory
    pub output_path: PathBuf,
}

/// Probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Request timeout in seconds (default: 15)
    pub timeout_secs: u64,
    /// Call /ping before fetching (default: false)
    pub ping_first: bool,
    /// Lower date bound; the probe uses a fixed window
    pub min_date: Option<DateTime<Utc>>,
    /// Upper date bound
    pub max_date: Option<DateTime<Utc>>,
    /// Output file, relative to the working directory
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            api: ApiConfig::default(),
            query: QueryConfig::default(),
            pull: PullConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: None,
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: 20,
            status: "live".to_string(),
            town: "London".to_string(),
            tags: "kids".to_string(),
            window_months: 12,
        }
    }
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            delay_secs: 60,
            timeout_secs: 30,
            output_path: PathBuf::from("datathistle-kids-london-full.json"),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            ping_first: false,
            min_date: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).single(),
            max_date: Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).single(),
            output_path: PathBuf::from("datathistle-full-response.json"),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match extension {
            "toml" => parse_toml(&content)?,
            "yaml" | "yml" => parse_yaml(&content)?,
            "json" => parse_json(&content)?,
            _ => {
                // Try to auto-detect format
                if content.trim().starts_with('{') {
                    parse_json(&content)?
                } else if content.contains("---") {
                    parse_yaml(&content)?
                } else {
                    parse_toml(&content)?
                }
            }
        };

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load from the file named by `THISTLE_CONFIG` (read through `lookup`),
    /// else from default locations
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(explicit) = lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            return Self::from_file(explicit.trim());
        }

        let locations = [
            "thistle-pull.toml",
            "thistle-pull.yaml",
            "thistle-pull.yml",
            "thistle-pull.json",
            "config.toml",
        ];

        for location in &locations {
            if Path::new(location).exists() {
                return Self::from_file(location);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_file = config_dir.join("thistle-pull/config.toml");
            if config_file.exists() {
                return Self::from_file(config_file);
            }
        }

        Err(ConfigError::NotFound(
            locations.iter().map(|l| l.to_string()).collect(),
        ))
    }

    /// Apply environment overrides read through `lookup`.
    /// Environment values always win over file values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api.key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = Some(level);
        }
        // Trimmed; a blank token counts as missing
        self.api.key = self
            .api
            .key
            .take()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    /// Bearer token, if one is configured
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api.key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Validate configuration.
    /// Returns non-fatal warnings for the caller to log.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        let key = self.api_key()?;

        if self.api.base_url.is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".to_string()));
        }
        if self.query.limit == 0 {
            return Err(ConfigError::Invalid("query.limit must be positive".to_string()));
        }
        if self.pull.timeout_secs == 0 || self.probe.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".to_string()));
        }
        if let (Some(min), Some(max)) = (self.probe.min_date, self.probe.max_date) {
            if min > max {
                return Err(ConfigError::Invalid(
                    "probe.min_date must not be after probe.max_date".to_string(),
                ));
            }
        }

        let mut warnings = Vec::new();
        if key.len() < MIN_EXPECTED_KEY_LEN {
            warnings.push(
                "Your API key looks too short. It should be a long JWT (starts with eyJ...)"
                    .to_string(),
            );
        }
        Ok(warnings)
    }

    /// Save configuration to file (the credential is never written)
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let mut safe_config = self.clone();
        safe_config.api.key = None;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content = match extension {
            "toml" => toml::to_string_pretty(&safe_config)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            "yaml" | "yml" => serde_yaml::to_string(&safe_config)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            _ => serde_json::to_string_pretty(&safe_config)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
        };

        std::fs::write(path, content)?;
        info!("Configuration saved to: {} (credential redacted)", path.display());
        Ok(())
    }
}

fn parse_toml(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn parse_yaml(content: &str) -> Result<Config, ConfigError> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn parse_json(content: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}
