//! Response DTOs for the tracker API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, OperationSnapshot, Source};
use crate::models::Page;

/// Message returned with every 429.
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests. Please try again later.";

/// Response body for paginated reads.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    /// Where the page came from
    pub source: Source,
    pub data: Vec<T>,
    /// Number of records in `data`
    pub count: usize,
    /// Total matching records in the backend
    pub total: u64,
    pub skip: u64,
    pub take: u32,
}

impl<T> ListResponse<T> {
    pub fn new(source: Source, data: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            source,
            count: data.len(),
            data,
            total,
            skip: page.skip,
            take: page.take,
        }
    }
}

/// Response body for single-record reads.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse<T> {
    pub source: Source,
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(source: Source, data: T) -> Self {
        Self { source, data }
    }
}

/// Response body for deletions.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The id that was deleted
    pub id: u64,
}

impl DeleteResponse {
    pub fn new(kind: &str, id: u64) -> Self {
        Self {
            message: format!("{} {} deleted successfully", kind, id),
            id,
        }
    }
}

/// Response body for admin clear operations.
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(message: impl Into<String>, removed: usize) -> Self {
        Self {
            message: message.into(),
            removed,
        }
    }
}

/// Response body for `GET /api/admin/cache/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Entries removed by write invalidation
    pub invalidations: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
    /// Per-operation profiler counters
    pub operations: Vec<OperationSnapshot>,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, operations: Vec<OperationSnapshot>) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            operations,
        }
    }
}

/// Body of the 429 sent by the rate limiter.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitedResponse {
    pub message: String,
}

impl Default for RateLimitedResponse {
    fn default() -> Self {
        Self {
            message: RATE_LIMIT_MESSAGE.to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Entries currently cached
    pub cache_entries: usize,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(cache_entries: usize) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            cache_entries,
        }
    }
}
