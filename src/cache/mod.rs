//! Cache Module
//!
//! Read-through caching for backend reads: deterministic keys, an
//! in-memory store with absolute and sliding expiration, prefix
//! invalidation, and per-operation profiling.

mod entry;
pub mod key;
mod lru;
mod profiler;
mod read_through;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{CacheEntry, ExpirationPolicy};
pub use key::{
    build_key, count_key, entity_key, paginated_key, CacheKey, COUNT_PART, KEY_DELIMITER,
};
pub use lru::LruTracker;
pub use profiler::{CacheProfiler, OperationSnapshot};
pub use read_through::{CachePolicy, Fetched, ReadThroughCache, SharedStore, Source};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::{CachedShape, CachedValue};

// == Public Constants ==
/// Maximum allowed key length in bytes.
///
/// Fits a search key whose name filter is the longest accepted (100
/// chars of up to 4 bytes each) plus its fixed parts.
pub const MAX_KEY_LENGTH: usize = 512;
