//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached payloads
    pub cache_max_entries: usize,
    /// Expiry backstop for cached payloads in seconds, 0 disables expiry
    pub cache_ttl: u64,
    /// Background cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Reject requests without a valid bearer token
    pub require_auth: bool,
    /// Accepted bearer tokens
    pub api_tokens: HashSet<String>,
    /// Cache list views (detail views are always cached)
    pub cache_lists: bool,
    /// Default page size for list views
    pub page_size: usize,
    /// Upper bound for a client-supplied page size
    pub max_page_size: usize,
    /// Directory receiving uploaded documents
    pub media_root: PathBuf,
    /// Maximum accepted request body for uploads
    pub max_upload_bytes: usize,
    /// Incoming webhook for upload notifications, None disables them
    pub slack_webhook_url: Option<String>,
    /// Bound on a single notification call in milliseconds
    pub notify_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached payloads (default: 1000)
    /// - `CACHE_TTL` - Expiry backstop in seconds, 0 = none (default: 300)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 5)
    /// - `REQUIRE_AUTH` - Enforce bearer tokens (default: false)
    /// - `API_TOKENS` - Comma-separated accepted tokens (default: empty)
    /// - `CACHE_LISTS` - Cache list views (default: true)
    /// - `PAGE_SIZE` / `MAX_PAGE_SIZE` - Pagination (default: 10 / 100)
    /// - `MEDIA_ROOT` - Upload directory (default: ./media)
    /// - `MAX_UPLOAD_BYTES` - Upload body limit (default: 10 MiB)
    /// - `SLACK_WEBHOOK_URL` - Upload notification webhook (default: unset)
    /// - `NOTIFY_TIMEOUT_MS` - Notification call bound (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_max_entries: parsed("CACHE_MAX_ENTRIES").unwrap_or(defaults.cache_max_entries),
            cache_ttl: parsed("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cleanup_interval: parsed("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            require_auth: flag("REQUIRE_AUTH").unwrap_or(defaults.require_auth),
            api_tokens: env::var("API_TOKENS")
                .map(|v| parse_tokens(&v))
                .unwrap_or(defaults.api_tokens),
            cache_lists: flag("CACHE_LISTS").unwrap_or(defaults.cache_lists),
            page_size: parsed("PAGE_SIZE").unwrap_or(defaults.page_size),
            max_page_size: parsed("MAX_PAGE_SIZE").unwrap_or(defaults.max_page_size),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
            slack_webhook_url: env::var("SLACK_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            notify_timeout_ms: parsed("NOTIFY_TIMEOUT_MS").unwrap_or(defaults.notify_timeout_ms),
        }
    }

    /// Cache expiry in seconds, None when expiry is disabled.
    pub fn cache_ttl_secs(&self) -> Option<u64> {
        (self.cache_ttl > 0).then_some(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_max_entries: 1000,
            cache_ttl: 300,
            cleanup_interval: 5,
            require_auth: false,
            api_tokens: HashSet::new(),
            cache_lists: true,
            page_size: 10,
            max_page_size: 100,
            media_root: PathBuf::from("./media"),
            max_upload_bytes: 10 * 1024 * 1024,
            slack_webhook_url: None,
            notify_timeout_ms: 3000,
        }
    }
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_tokens(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
