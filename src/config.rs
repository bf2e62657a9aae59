//! Storefront configuration parsed from environment variables.
//!
//! Required:
//! - `STOREFRONT_BASE_URL`
//!
//! Optional (defaults in the constants below; unparsable numbers fall back
//! to the default):
//! - `STOREFRONT_NAMESPACE`
//! - `STOREFRONT_WISHLIST_MAX`, `STOREFRONT_RECENTLY_VIEWED_MAX`
//! - `STOREFRONT_NOTICE_TTL_MS`
//! - `STOREFRONT_SEARCH_DEBOUNCE_MS`, `STOREFRONT_SEARCH_MIN_CHARS`, `STOREFRONT_SEARCH_LIMIT`
//! - `STOREFRONT_REQUEST_TIMEOUT_SECS`, `STOREFRONT_CONNECT_TIMEOUT_SECS`
//! - `STOREFRONT_STORAGE_PATH`

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ErrorCode;

pub const DEFAULT_NAMESPACE: &str = "umino";
pub const DEFAULT_RECENTLY_VIEWED_MAX: usize = 10;
pub const DEFAULT_NOTICE_TTL_MS: u64 = 3000;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SEARCH_MIN_CHARS: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {var}")]
    Missing { var: &'static str },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_chars: usize,
    pub limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            min_chars: DEFAULT_SEARCH_MIN_CHARS,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Storefront origin, without a trailing slash.
    pub base_url: String,
    /// Prefix of every collection storage key.
    pub namespace: String,
    pub wishlist_max: Option<usize>,
    pub recently_viewed_max: usize,
    pub notice_ttl: Duration,
    pub search: SearchSettings,
    pub timeouts: HttpTimeouts,
    /// JSON file for durable storage. In-memory storage when `None`.
    pub storage_path: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Config with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            wishlist_max: None,
            recently_viewed_max: DEFAULT_RECENTLY_VIEWED_MAX,
            notice_ttl: Duration::from_millis(DEFAULT_NOTICE_TTL_MS),
            search: SearchSettings::default(),
            timeouts: HttpTimeouts::default(),
            storage_path: None,
        }
    }

    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `STOREFRONT_BASE_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `STOREFRONT_BASE_URL` is missing or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("STOREFRONT_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing { var: "STOREFRONT_BASE_URL" })?;
        let mut config = Self::new(base_url.trim());

        if let Some(namespace) = lookup("STOREFRONT_NAMESPACE") {
            config.namespace = namespace.trim().to_owned();
        }
        config.wishlist_max = lookup("STOREFRONT_WISHLIST_MAX").and_then(|v| v.trim().parse().ok());
        config.recently_viewed_max = parse_or(&lookup, "STOREFRONT_RECENTLY_VIEWED_MAX", DEFAULT_RECENTLY_VIEWED_MAX);
        config.notice_ttl = Duration::from_millis(parse_or(&lookup, "STOREFRONT_NOTICE_TTL_MS", DEFAULT_NOTICE_TTL_MS));
        config.search = SearchSettings {
            debounce: Duration::from_millis(parse_or(&lookup, "STOREFRONT_SEARCH_DEBOUNCE_MS", DEFAULT_SEARCH_DEBOUNCE_MS)),
            min_chars: parse_or(&lookup, "STOREFRONT_SEARCH_MIN_CHARS", DEFAULT_SEARCH_MIN_CHARS),
            limit: parse_or(&lookup, "STOREFRONT_SEARCH_LIMIT", DEFAULT_SEARCH_LIMIT),
        };
        config.timeouts = HttpTimeouts {
            request_secs: parse_or(&lookup, "STOREFRONT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(&lookup, "STOREFRONT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        config.storage_path = lookup("STOREFRONT_STORAGE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
