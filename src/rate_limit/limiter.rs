//! Fixed-window limiter
//!
//! Counts requests per (client, path) in windows that start at a client's
//! first request and last `window`. Once `threshold` requests have been
//! allowed in a window, the rest of that window is rejected.

use std::collections::HashSet;
use std::time::Duration;

use dashmap::DashMap;

use crate::clock::SharedClock;
use crate::config::Config;

/// Request counter of one (client, path) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindowCounter {
    /// Requests allowed in the current window
    pub count: u32,
    /// Unix milliseconds at which the window ends
    pub reset_at: u64,
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Let the request through.
    Allowed {
        /// Requests left in this window
        remaining: u32,
    },
    /// Reject with 429.
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Limiter settings.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub threshold: u32,
    pub window: Duration,
    pub protected_paths: Vec<String>,
}

impl RateLimitConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.rate_limit_threshold,
            window: Duration::from_secs(config.rate_limit_window),
            protected_paths: config.rate_limit_paths.clone(),
        }
    }
}

// == Fixed Window Limiter ==
/// Per-client, per-path fixed-window limiter.
///
/// Each check runs under the map's shard lock for its key, so concurrent
/// requests from one client cannot both take the last slot. Different
/// keys do not contend unless they share a shard.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    counters: DashMap<(String, String), RateWindowCounter>,
    protected: HashSet<String>,
    threshold: u32,
    window_ms: u64,
    clock: SharedClock,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig, clock: SharedClock) -> Self {
        Self {
            counters: DashMap::new(),
            protected: config
                .protected_paths
                .iter()
                .map(|p| normalize_path(p))
                .collect(),
            threshold: config.threshold.max(1),
            window_ms: (config.window.as_millis() as u64).max(1),
            clock,
        }
    }

    pub fn from_config(config: &Config, clock: SharedClock) -> Self {
        Self::new(RateLimitConfig::from_config(config), clock)
    }

    // == Is Protected ==
    /// True if requests to `path` are counted.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.contains(&normalize_path(path))
    }

    // == Check ==
    /// Counts one request from `client` to `path` and decides on it.
    ///
    /// Rejected requests do not raise the count.
    pub fn check(&self, client: &str, path: &str) -> RateDecision {
        let now = self.clock.now_ms();
        let key = (client.to_string(), normalize_path(path));

        let mut counter = self.counters.entry(key).or_insert(RateWindowCounter {
            count: 0,
            reset_at: now,
        });

        if now >= counter.reset_at {
            counter.count = 1;
            counter.reset_at = now + self.window_ms;
            return RateDecision::Allowed {
                remaining: self.threshold - 1,
            };
        }

        if counter.count < self.threshold {
            counter.count += 1;
            return RateDecision::Allowed {
                remaining: self.threshold - counter.count,
            };
        }

        RateDecision::Limited {
            retry_after: Duration::from_millis(counter.reset_at - now),
        }
    }

    /// Current counter of a (client, path) pair, if one exists.
    pub fn counter(&self, client: &str, path: &str) -> Option<RateWindowCounter> {
        self.counters
            .get(&(client.to_string(), normalize_path(path)))
            .map(|c| *c)
    }

    // == Sweep ==
    /// Drops counters whose window has ended. Returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let before = self.counters.len();
        self.counters.retain(|_, counter| now < counter.reset_at);
        before.saturating_sub(self.counters.len())
    }

    /// Number of live counters.
    pub fn tracked(&self) -> usize {
        self.counters.len()
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// Lowercases and strips a trailing slash, so `/API/Auth/Login/` and
/// `/api/auth/login` share a counter.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}
