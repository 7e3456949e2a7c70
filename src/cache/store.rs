//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking,
//! absolute/sliding expiration and prefix invalidation.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::key::{count_key, paginated_key, KEY_DELIMITER};
use crate::cache::{CacheEntry, CacheStats, ExpirationPolicy, LruTracker, MAX_KEY_LENGTH};
use crate::clock::SharedClock;
use crate::error::CacheError;

// == Cache Store ==
/// In-memory key-value store with expiration and LRU eviction.
///
/// The store is not synchronized; share it behind `Arc<RwLock<_>>`.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    clock: SharedClock,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            clock,
        }
    }

    // == Set ==
    /// Stores a value under `key`.
    ///
    /// If the key already exists, the value is overwritten and its
    /// expiration restarts. If the cache is at capacity, the least
    /// recently used entry is evicted.
    pub fn set(
        &mut self,
        key: String,
        value: V,
        policy: ExpirationPolicy,
    ) -> Result<(), CacheError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "key must be 1 to {} bytes, got {}",
                MAX_KEY_LENGTH,
                key.len()
            )));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                    debug!(key = %evicted_key, "evicted least recently used entry");
                }
                None => {
                    return Err(CacheError::CacheFull(
                        "Cache is full and eviction failed".to_string(),
                    ));
                }
            }
        }

        let entry = CacheEntry::new(value, policy, self.clock.now_ms());
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit restarts the entry's sliding window. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Result<V, CacheError> {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Like [`get`](Self::get), but only a value `extract` accepts is a hit.
    ///
    /// A rejected value is left in place untouched and counted as a miss.
    pub fn get_with<T>(
        &mut self,
        key: &str,
        extract: impl FnOnce(&V) -> Option<T>,
    ) -> Result<T, CacheError> {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired(now) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return Err(CacheError::Expired(key.to_string()));
        }

        let Some(value) = extract(&entry.value) else {
            self.stats.record_miss();
            return Err(CacheError::ShapeMismatch(key.to_string()));
        };

        entry.touch(now);
        self.stats.record_hit();
        self.lru.touch(key);
        Ok(value)
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Invalidate ==
    /// Removes the keys a write to `prefix` plausibly made stale.
    ///
    /// Drops the bare `prefix` key, the first `page_count` pages of size
    /// `page_size` (`prefix_skip_{i * page_size}_take_{page_size}`), and
    /// `prefix_{id}` when `specific_id` is given. Keys outside that set,
    /// such as filtered searches or other page sizes, are left to expire.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(
        &mut self,
        prefix: &str,
        specific_id: Option<&str>,
        page_count: u32,
        page_size: u32,
    ) -> usize {
        let mut candidates = Vec::with_capacity(page_count as usize + 2);
        candidates.push(prefix.to_string());
        candidates.extend(
            (0..page_count).map(|i| paginated_key(prefix, i as u64 * page_size as u64, page_size)),
        );
        if let Some(id) = specific_id {
            candidates.push(format!("{}{}{}", prefix, KEY_DELIMITER, id));
        }

        let removed = candidates.iter().filter(|key| self.remove(key)).count();
        self.stats.record_invalidations(removed);
        debug!(prefix, removed, "invalidated cache keys");
        removed
    }

    // == Invalidate Prefix ==
    /// Removes `prefix` and every key that starts with `prefix_`.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let scoped = format!("{}{}", prefix, KEY_DELIMITER);
        self.remove_where(|key| key == prefix || key.starts_with(&scoped))
    }

    // == Invalidate Counts ==
    /// Removes every total-count key under `prefix`: `prefix_count` and
    /// all filtered `prefix_count_*` keys.
    pub fn invalidate_counts(&mut self, prefix: &str) -> usize {
        let bare = count_key(prefix, &[]);
        let scoped = format!("{}{}", bare, KEY_DELIMITER);
        self.remove_where(|key| key == bare || key.starts_with(&scoped))
    }

    fn remove_where(&mut self, matches: impl Fn(&str) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| matches(key))
            .cloned()
            .collect();

        let removed = doomed.iter().filter(|key| self.remove(key)).count();
        self.stats.record_invalidations(removed);
        removed
    }

    // == Clear ==
    /// Removes every entry. Returns how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove(key);
        }

        expired_keys.len()
    }

    /// Returns true if `key` holds a live entry. Does not touch the entry.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .map_or(false, |entry| !entry.is_expired(now))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
