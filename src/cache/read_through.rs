//! Read-through orchestration
//!
//! Lookup, fall back to the backend on a miss, store the result, and tag
//! the answer with where it came from.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheProfiler, CacheStore, CachedShape, CachedValue, ExpirationPolicy};
use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::Result;

/// The cache store as shared by handlers and the sweep task.
pub type SharedStore = Arc<RwLock<CacheStore<CachedValue>>>;

/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
}

/// A value together with its [`Source`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

// == Cache Policy ==
/// Expiration and invalidation settings of the read-through layer.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    /// Policy of record and page entries
    pub data: ExpirationPolicy,
    /// Policy of total-count entries; shorter-lived than `data`
    pub count: ExpirationPolicy,
    /// Page size assumed when guessing keys to invalidate
    pub page_size: u32,
    /// Number of pages guessed per invalidation
    pub invalidate_pages: u32,
    /// Also scan for every key under the invalidated prefix
    pub strict_invalidation: bool,
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            data: ExpirationPolicy::sliding(
                Duration::from_secs(config.cache_ttl),
                Duration::from_secs(config.cache_sliding),
            ),
            count: ExpirationPolicy::absolute(Duration::from_secs(config.cache_count_ttl)),
            page_size: config.cache_page_size.max(1),
            invalidate_pages: config.cache_invalidate_pages,
            strict_invalidation: config.cache_strict_invalidation,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// == Read-Through Cache ==
/// Cache front for backend reads. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReadThroughCache {
    store: SharedStore,
    profiler: Arc<CacheProfiler>,
    policy: CachePolicy,
}

impl ReadThroughCache {
    pub fn new(store: CacheStore<CachedValue>, policy: CachePolicy) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            profiler: Arc::new(CacheProfiler::new()),
            policy,
        }
    }

    /// Builds the store and policy from configuration.
    pub fn from_config(config: &Config, clock: SharedClock) -> Self {
        Self::new(
            CacheStore::new(config.cache_max_entries, clock),
            CachePolicy::from_config(config),
        )
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn profiler(&self) -> &CacheProfiler {
        &self.profiler
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    // == Lookup ==
    /// Reads `key` as a `T`.
    ///
    /// Absent, expired, rejected and wrongly-shaped entries all read as `None`.
    pub async fn lookup<T: CachedShape>(&self, key: &str) -> Option<T> {
        let result = self.store.write().await.get_with(key, T::from_cached);
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, reason = %err, "cache miss");
                None
            }
        }
    }

    // == Populate ==
    /// Writes `value` under `key`. A rejected write is logged and dropped.
    pub async fn populate<T: CachedShape>(&self, key: String, value: T, policy: ExpirationPolicy) {
        let result = self.store.write().await.set(key.clone(), value.into_cached(), policy);
        if let Err(err) = result {
            warn!(key = %key, error = %err, "failed to populate cache");
        }
    }

    // == Get Or Fetch ==
    /// Serves `key` from the cache, or runs `fetch` and caches its result.
    ///
    /// Backend errors are returned as-is and nothing is cached. Concurrent
    /// misses on the same key each run their own fetch; the last write wins.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        operation: &str,
        key: String,
        policy: ExpirationPolicy,
        fetch: F,
    ) -> Result<Fetched<T>>
    where
        T: CachedShape + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let started = Instant::now();
        if let Some(value) = self.lookup::<T>(&key).await {
            self.profiler.record_hit(operation, started.elapsed());
            debug!(operation, key = %key, "served from cache");
            return Ok(Fetched {
                value,
                source: Source::Cache,
            });
        }
        self.profiler.record_miss(operation, started.elapsed());

        let fetch_started = Instant::now();
        let value = fetch().await?;
        self.profiler.record_fetch(operation, fetch_started.elapsed());

        self.populate(key, value.clone(), policy).await;

        Ok(Fetched {
            value,
            source: Source::Database,
        })
    }

    /// [`get_or_fetch`](Self::get_or_fetch) with the data policy.
    pub async fn get_or_fetch_data<T, F, Fut>(
        &self,
        operation: &str,
        key: String,
        fetch: F,
    ) -> Result<Fetched<T>>
    where
        T: CachedShape + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.get_or_fetch(operation, key, self.policy.data, fetch).await
    }

    /// [`get_or_fetch`](Self::get_or_fetch) for a total count, with the
    /// shorter count policy.
    pub async fn get_or_fetch_count<F, Fut>(
        &self,
        operation: &str,
        key: String,
        fetch: F,
    ) -> Result<Fetched<u64>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64>>,
    {
        self.get_or_fetch(operation, key, self.policy.count, fetch).await
    }

    // == Invalidate ==
    /// Drops the keys a write under `prefix` made stale.
    ///
    /// Always removes the bare prefix, the guessed first pages,
    /// `prefix_{id}` and every total-count key under the prefix. With
    /// strict invalidation enabled, every other key under the prefix goes
    /// too.
    pub async fn invalidate(&self, prefix: &str, specific_id: Option<u64>) -> usize {
        let id = specific_id.map(|id| id.to_string());
        let mut store = self.store.write().await;
        let mut removed = store.invalidate(
            prefix,
            id.as_deref(),
            self.policy.invalidate_pages,
            self.policy.page_size,
        );
        removed += store.invalidate_counts(prefix);
        if self.policy.strict_invalidation {
            removed += store.invalidate_prefix(prefix);
        }
        removed
    }

    /// Removes every cached entry.
    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock() -> (ReadThroughCache, Arc<ManualClock>) {
        let clock = ManualClock::new(1_000_000);
        let cache = ReadThroughCache::new(CacheStore::new(100, clock.clone()), CachePolicy::default());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (cache, _) = cache_with_clock();
        let fetches = AtomicUsize::new(0);

        for expected in [Source::Database, Source::Cache] {
            let fetched = cache
                .get_or_fetch_count("inventory_count", "inventory_count".to_string(), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await
                .unwrap();
            assert_eq!(fetched.value, 42);
            assert_eq!(fetched.source, expected);
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        let stats = cache.profiler().operation("inventory_count").unwrap();
        assert_eq!((stats.hits, stats.misses, stats.fetches), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_backend_error_is_not_cached() {
        let (cache, _) = cache_with_clock();

        let result = cache
            .get_or_fetch_count("inventory_count", "inventory_count".to_string(), || async {
                Err(AppError::Backend("connection refused".into()))
            })
            .await;
        assert!(matches!(result, Err(AppError::Backend(_))));
        assert_eq!(cache.len().await, 0);

        let fetched = cache
            .get_or_fetch_count("inventory_count", "inventory_count".to_string(), || async {
                Ok(7)
            })
            .await
            .unwrap();
        assert_eq!(fetched.source, Source::Database);
    }

    #[tokio::test]
    async fn test_count_expires_before_data() {
        let (cache, clock) = cache_with_clock();
        cache
            .populate("c".to_string(), 1u64, cache.policy().count)
            .await;
        cache
            .populate("d".to_string(), 2u64, cache.policy().data)
            .await;

        clock.advance_secs(61);

        assert_eq!(cache.lookup::<u64>("c").await, None);
        assert_eq!(cache.lookup::<u64>("d").await, Some(2));
    }

    #[tokio::test]
    async fn test_wrong_shape_reads_as_miss() {
        let (cache, _) = cache_with_clock();
        cache
            .populate("order_data_1".to_string(), 5u64, cache.policy().data)
            .await;

        let fetched = cache
            .get_or_fetch_data("order_get", "order_data_1".to_string(), || async {
                Ok(Vec::<crate::models::Order>::new())
            })
            .await
            .unwrap();
        assert_eq!(fetched.source, Source::Database);
    }

    #[tokio::test]
    async fn test_rejected_key_falls_through_to_backend() {
        let (cache, _) = cache_with_clock();
        let key = "k".repeat(crate::cache::MAX_KEY_LENGTH + 1);

        for _ in 0..2 {
            let fetched = cache
                .get_or_fetch_count("long", key.clone(), || async { Ok(1) })
                .await
                .unwrap();
            assert_eq!(fetched.source, Source::Database);
        }
    }

    #[tokio::test]
    async fn test_wrong_shape_counts_as_store_miss() {
        let (cache, _) = cache_with_clock();
        cache
            .populate("order_data_1".to_string(), 5u64, cache.policy().data)
            .await;

        assert_eq!(cache.lookup::<crate::models::Order>("order_data_1").await, None);

        let stats = cache.store().read().await.stats();
        assert_eq!((stats.hits, stats.misses), (0, 1));
    }

    #[tokio::test]
    async fn test_invalidate_drops_totals() {
        let (cache, _) = cache_with_clock();
        for key in ["inventory_count", "inventory_count_name_crate_min_any"] {
            cache.populate(key.to_string(), 5u64, cache.policy().count).await;
        }

        let removed = cache.invalidate("inventory", None).await;

        assert_eq!(removed, 2);
        assert_eq!(cache.lookup::<u64>("inventory_count").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_strict_invalidation_drops_filtered_keys() {
        let clock = ManualClock::new(0);
        let policy = CachePolicy {
            strict_invalidation: true,
            ..CachePolicy::default()
        };
        let cache = ReadThroughCache::new(CacheStore::new(100, clock), policy);
        let search_key = "inventory_search_name_crate_min_any_skip_0_take_50".to_string();
        cache.populate(search_key.clone(), 3u64, cache.policy().data).await;
        cache.populate("inventory_skip_0_take_50".to_string(), 3u64, cache.policy().data).await;

        let removed = cache.invalidate("inventory", None).await;

        assert_eq!(removed, 2);
        assert_eq!(cache.lookup::<u64>(&search_key).await, None);
    }
}
