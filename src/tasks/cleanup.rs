//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries and
//! finished rate-limit windows.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;
use crate::rate_limit::FixedWindowLimiter;

/// Spawns a background task that sweeps the cache store and the limiter.
///
/// Returns a JoinHandle that is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(cache.store().clone(), limiter.clone(), 30);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    store: SharedStore,
    limiter: Arc<FixedWindowLimiter>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed_entries = store.write().await.cleanup_expired();
            let removed_windows = limiter.sweep_expired();

            if removed_entries > 0 || removed_windows > 0 {
                info!(
                    removed_entries,
                    removed_windows, "expiry sweep removed stale state"
                );
            } else {
                debug!("expiry sweep: nothing to remove");
            }
        }
    })
}
