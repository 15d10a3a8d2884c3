//! Client configuration.
//!
//! Defaults point at a local development backend. Override via environment
//! variables or explicit construction.

use fsclens_core::query::DEFAULT_SEARCH_LIMIT;
use fsclens_core::stats::DEFAULT_RECENT_CAP;
use reqwest::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1}")]
    InvalidNumber(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the version prefix, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Result limit sent with each search.
    pub search_limit: u32,
    /// Number of recent decisions requested for the dashboard.
    pub recent_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            search_limit: DEFAULT_SEARCH_LIMIT,
            recent_limit: DEFAULT_RECENT_CAP,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given base URL with default limits.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: check_url("base_url", &base_url.into())?,
            ..Self::default()
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FSCLENS_API_URL` (default: `http://localhost:8000/api/v1`)
    /// - `FSCLENS_TIMEOUT_SECS` (default: 30)
    /// - `FSCLENS_SEARCH_LIMIT` (default: 50)
    /// - `FSCLENS_RECENT_LIMIT` (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_url = match lookup("FSCLENS_API_URL") {
            Some(raw) => check_url("FSCLENS_API_URL", &raw)?,
            None => defaults.base_url,
        };
        Ok(Self {
            base_url,
            timeout_secs: parse_or(&lookup, "FSCLENS_TIMEOUT_SECS", defaults.timeout_secs)?,
            search_limit: parse_or(&lookup, "FSCLENS_SEARCH_LIMIT", defaults.search_limit)?,
            recent_limit: parse_or(&lookup, "FSCLENS_RECENT_LIMIT", defaults.recent_limit)?,
        })
    }
}

fn check_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ConfigError::InvalidUrl(var.to_string(), reason);
    let url = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
    }
}
