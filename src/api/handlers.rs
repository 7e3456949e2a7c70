//! Shared handler state and the health probe.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::cache::ReadThroughCache;
use crate::clock::{SharedClock, SystemClock};
use crate::config::Config;
use crate::models::HealthResponse;
use crate::rate_limit::FixedWindowLimiter;
use crate::repository::{InventoryRepository, MemoryRepository, OrderRepository};

/// Application state shared across all handlers.
///
/// Everything is constructed once at startup and handed in here.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache in front of the repositories
    pub cache: ReadThroughCache,
    pub inventory: Arc<dyn InventoryRepository>,
    pub orders: Arc<dyn OrderRepository>,
    /// Limiter used by the rate-limit middleware
    pub limiter: Arc<FixedWindowLimiter>,
    /// Token the cache admin endpoints require
    pub admin_token: Option<String>,
}

impl AppState {
    /// Wires state from configuration, repositories and a clock.
    pub fn new(
        config: &Config,
        inventory: Arc<dyn InventoryRepository>,
        orders: Arc<dyn OrderRepository>,
        clock: SharedClock,
    ) -> Self {
        Self {
            cache: ReadThroughCache::from_config(config, clock.clone()),
            inventory,
            orders,
            limiter: Arc::new(FixedWindowLimiter::from_config(config, clock)),
            admin_token: config.admin_token.clone(),
        }
    }

    /// State backed by one in-memory repository and the system clock.
    pub fn with_repository(config: &Config, repository: Arc<MemoryRepository>) -> Self {
        Self::new(
            config,
            repository.clone(),
            repository,
            SystemClock::shared(),
        )
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.len().await))
}
