//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default paths guarded by the rate limiter.
pub const DEFAULT_PROTECTED_PATHS: &[&str] = &["/api/auth/login", "/api/auth/register"];

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// Absolute TTL in seconds for cached data
    pub cache_ttl: u64,
    /// Sliding expiration window in seconds, 0 disables it
    pub cache_sliding: u64,
    /// TTL in seconds for cached total counts
    pub cache_count_ttl: u64,
    /// Page size assumed when guessing paginated keys to invalidate
    pub cache_page_size: u32,
    /// Number of paginated keys guessed per invalidation
    pub cache_invalidate_pages: u32,
    /// Also drop every key under an invalidated prefix
    pub cache_strict_invalidation: bool,
    /// Requests allowed per client and path within one window
    pub rate_limit_threshold: u32,
    /// Rate-limit window length in seconds
    pub rate_limit_window: u64,
    /// Paths subject to rate limiting
    pub rate_limit_paths: Vec<String>,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Token required by the cache admin endpoints
    pub admin_token: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_TTL` - Absolute TTL in seconds (default: 300)
    /// - `CACHE_SLIDING` - Sliding window in seconds (default: 120)
    /// - `CACHE_COUNT_TTL` - Total-count TTL in seconds (default: 60)
    /// - `CACHE_PAGE_SIZE` - Page size for invalidation (default: 50)
    /// - `CACHE_INVALIDATE_PAGES` - Pages guessed per invalidation (default: 10)
    /// - `CACHE_STRICT_INVALIDATION` - Prefix-scan invalidation (default: false)
    /// - `RATE_LIMIT_THRESHOLD` - Requests per window (default: 5)
    /// - `RATE_LIMIT_WINDOW` - Window length in seconds (default: 60)
    /// - `RATE_LIMIT_PATHS` - Comma-separated protected paths
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `ADMIN_TOKEN` - Admin endpoint token (default: unset, admin disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cache_sliding: env_or("CACHE_SLIDING", defaults.cache_sliding),
            cache_count_ttl: env_or("CACHE_COUNT_TTL", defaults.cache_count_ttl),
            cache_page_size: env_or("CACHE_PAGE_SIZE", defaults.cache_page_size),
            cache_invalidate_pages: env_or(
                "CACHE_INVALIDATE_PAGES",
                defaults.cache_invalidate_pages,
            ),
            cache_strict_invalidation: env_or(
                "CACHE_STRICT_INVALIDATION",
                defaults.cache_strict_invalidation,
            ),
            rate_limit_threshold: env_or("RATE_LIMIT_THRESHOLD", defaults.rate_limit_threshold),
            rate_limit_window: env_or("RATE_LIMIT_WINDOW", defaults.rate_limit_window),
            rate_limit_paths: env::var("RATE_LIMIT_PATHS")
                .ok()
                .map(|v| parse_paths(&v))
                .filter(|paths| !paths.is_empty())
                .unwrap_or(defaults.rate_limit_paths),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_max_entries: 10_000,
            cache_ttl: 300,
            cache_sliding: 120,
            cache_count_ttl: 60,
            cache_page_size: 50,
            cache_invalidate_pages: 10,
            cache_strict_invalidation: false,
            rate_limit_threshold: 5,
            rate_limit_window: 60,
            rate_limit_paths: DEFAULT_PROTECTED_PATHS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            cleanup_interval: 30,
            admin_token: None,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_paths(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
