//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::aggregator::{AggregateOptions, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_MAX_PAGES};
use crate::scrape::fetcher::DEFAULT_MAX_BODY_BYTES;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached responses
    pub max_entries: usize,
    /// Default TTL in seconds for cached responses
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Root of the site being scraped
    pub upstream_base_url: String,
    /// Per-request upstream timeout in seconds
    pub fetch_timeout: u64,
    /// Largest upstream page body read, in bytes
    pub max_body_bytes: usize,
    /// Simultaneous page fetches per listing
    pub concurrency_limit: usize,
    /// Ceiling on pages fetched per listing
    pub max_pages: u32,
    /// CSS selector for listing entries (must match elements with `href`)
    pub item_selector: String,
    /// CSS selector for the pagination block
    pub pagination_selector: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_BASE_URL` - Site root (default: `http://127.0.0.1:8080`)
    /// - `FETCH_TIMEOUT` - Upstream timeout in seconds (default: 10)
    /// - `MAX_BODY_BYTES` - Upstream body cap in bytes (default: 5 MiB)
    /// - `CONCURRENCY_LIMIT` - Parallel page fetches (default: 3)
    /// - `MAX_PAGES` - Page ceiling per listing (default: 100)
    /// - `ITEM_SELECTOR` - Listing entry selector (default: `article a[href]`)
    /// - `PAGINATION_SELECTOR` - Pagination selector (default: `.pagination`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            upstream_base_url: env_or("UPSTREAM_BASE_URL", defaults.upstream_base_url),
            fetch_timeout: env_or("FETCH_TIMEOUT", defaults.fetch_timeout),
            max_body_bytes: env_or("MAX_BODY_BYTES", defaults.max_body_bytes),
            concurrency_limit: env_or("CONCURRENCY_LIMIT", defaults.concurrency_limit),
            max_pages: env_or("MAX_PAGES", defaults.max_pages),
            item_selector: env_or("ITEM_SELECTOR", defaults.item_selector),
            pagination_selector: env_or("PAGINATION_SELECTOR", defaults.pagination_selector),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Never zero, so the sweep loop cannot spin.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout.max(1))
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            concurrency_limit: self.concurrency_limit,
            max_pages: self.max_pages,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 60,
            upstream_base_url: "http://127.0.0.1:8080".to_string(),
            fetch_timeout: 10,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            max_pages: DEFAULT_MAX_PAGES,
            item_selector: "article a[href]".to_string(),
            pagination_selector: ".pagination".to_string(),
        }
    }
}
