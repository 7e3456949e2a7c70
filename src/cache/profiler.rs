//! Cache profiler
//!
//! Per-operation hit/miss counters and timings, exported to the admin
//! endpoints as JSON or CSV.

use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

use crate::error::{AppError, Result};

const CSV_HEADER: [&str; 7] = [
    "operation",
    "hits",
    "misses",
    "hit_rate",
    "avg_lookup_us",
    "fetches",
    "avg_fetch_us",
];

#[derive(Debug, Default, Clone, Copy)]
struct OperationCounters {
    hits: u64,
    misses: u64,
    lookup_us: u64,
    fetches: u64,
    fetch_us: u64,
}

/// Read-only view of one operation's counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationSnapshot {
    pub operation: String,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    /// Average time spent in the cache lookup, microseconds
    pub avg_lookup_us: f64,
    /// Backend fetches performed on misses
    pub fetches: u64,
    /// Average backend fetch time, microseconds
    pub avg_fetch_us: f64,
}

impl OperationSnapshot {
    fn new(operation: &str, c: &OperationCounters) -> Self {
        let lookups = c.hits + c.misses;
        Self {
            operation: operation.to_string(),
            hits: c.hits,
            misses: c.misses,
            hit_rate: ratio(c.hits, lookups),
            avg_lookup_us: ratio(c.lookup_us, lookups),
            fetches: c.fetches,
            avg_fetch_us: ratio(c.fetch_us, c.fetches),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Counters keyed by operation name (e.g. `inventory_list`).
#[derive(Debug, Default)]
pub struct CacheProfiler {
    operations: DashMap<String, OperationCounters>,
}

impl CacheProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self, operation: &str, lookup: Duration) {
        let mut counters = self.operations.entry(operation.to_string()).or_default();
        counters.hits += 1;
        counters.lookup_us += lookup.as_micros() as u64;
    }

    pub fn record_miss(&self, operation: &str, lookup: Duration) {
        let mut counters = self.operations.entry(operation.to_string()).or_default();
        counters.misses += 1;
        counters.lookup_us += lookup.as_micros() as u64;
    }

    pub fn record_fetch(&self, operation: &str, elapsed: Duration) {
        let mut counters = self.operations.entry(operation.to_string()).or_default();
        counters.fetches += 1;
        counters.fetch_us += elapsed.as_micros() as u64;
    }

    /// Snapshot of every operation, sorted by name.
    pub fn snapshot(&self) -> Vec<OperationSnapshot> {
        let mut rows: Vec<OperationSnapshot> = self
            .operations
            .iter()
            .map(|entry| OperationSnapshot::new(entry.key(), entry.value()))
            .collect();
        rows.sort_by(|a, b| a.operation.cmp(&b.operation));
        rows
    }

    pub fn operation(&self, operation: &str) -> Option<OperationSnapshot> {
        self.operations
            .get(operation)
            .map(|c| OperationSnapshot::new(operation, c.value()))
    }

    /// Renders the snapshot as CSV with a header row.
    pub fn export_csv(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for row in self.snapshot() {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e.error())))?;
        String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn reset(&self) {
        self.operations.clear();
    }
}
