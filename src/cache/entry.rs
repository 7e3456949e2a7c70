//! Cache Entry Module
//!
//! Defines individual cache entries with absolute and sliding expiration.

use std::time::Duration;

// == Expiration Policy ==
/// How long an entry may live.
///
/// `ttl` is the absolute lifetime measured from the write. `sliding`, when
/// set, additionally evicts an entry that has not been read for that long.
/// Reads refresh the sliding timer but never move the absolute deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub ttl: Duration,
    pub sliding: Option<Duration>,
}

impl ExpirationPolicy {
    /// Absolute expiration only.
    pub fn absolute(ttl: Duration) -> Self {
        Self { ttl, sliding: None }
    }

    /// Absolute expiration plus a sliding window. A zero window disables sliding.
    pub fn sliding(ttl: Duration, window: Duration) -> Self {
        Self {
            ttl,
            sliding: (!window.is_zero()).then_some(window),
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// All timestamps are Unix milliseconds taken from the store's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp
    pub created_at: u64,
    /// Absolute expiration timestamp
    pub expires_at: u64,
    /// Sliding window in milliseconds, if any
    pub sliding_ms: Option<u64>,
    /// Last read (or write) timestamp
    pub last_access: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry written at `now`.
    pub fn new(value: V, policy: ExpirationPolicy, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(policy.ttl.as_millis() as u64),
            sliding_ms: policy.sliding.map(|w| w.as_millis() as u64),
            last_access: now,
        }
    }

    // == Deadline ==
    /// The earliest moment the entry stops being served.
    pub fn deadline(&self) -> u64 {
        match self.sliding_ms {
            Some(window) => self
                .expires_at
                .min(self.last_access.saturating_add(window)),
            None => self.expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once `now` reaches its deadline, so an entry
    /// written with a TTL of `t` is served strictly before `created_at + t`.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline()
    }

    // == Touch ==
    /// Records a read, restarting the sliding window.
    pub fn touch(&mut self, now: u64) {
        self.last_access = now;
    }

    // == Time To Live ==
    /// Returns milliseconds left before the entry stops being served.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.deadline().saturating_sub(now)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_000_000;

    #[test]
    fn test_entry_absolute_expiration() {
        let entry = CacheEntry::new("v", ExpirationPolicy::absolute(Duration::from_secs(10)), T0);

        assert_eq!(entry.expires_at, T0 + 10_000);
        assert!(!entry.is_expired(T0));
        assert!(!entry.is_expired(T0 + 9_999));
        assert!(entry.is_expired(T0 + 10_000));
    }

    #[test]
    fn test_entry_sliding_evicts_idle_entry() {
        let policy = ExpirationPolicy::sliding(Duration::from_secs(300), Duration::from_secs(60));
        let entry = CacheEntry::new("v", policy, T0);

        assert!(!entry.is_expired(T0 + 59_999));
        assert!(entry.is_expired(T0 + 60_000));
    }

    #[test]
    fn test_entry_touch_never_passes_absolute() {
        let policy = ExpirationPolicy::sliding(Duration::from_secs(100), Duration::from_secs(60));
        let mut entry = CacheEntry::new("v", policy, T0);

        entry.touch(T0 + 50_000);
        assert!(!entry.is_expired(T0 + 99_999));

        entry.touch(T0 + 99_000);
        assert_eq!(entry.deadline(), T0 + 100_000);
        assert!(entry.is_expired(T0 + 100_000));
    }

    #[test]
    fn test_zero_sliding_window_disabled() {
        let policy = ExpirationPolicy::sliding(Duration::from_secs(10), Duration::ZERO);
        assert!(policy.sliding.is_none());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("v", ExpirationPolicy::absolute(Duration::from_secs(10)), T0);

        assert_eq!(entry.ttl_remaining_ms(T0 + 4_000), 6_000);
        assert_eq!(entry.ttl_remaining_ms(T0 + 20_000), 0);
    }
}
