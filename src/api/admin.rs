//! Cache administration endpoints
//!
//! All of them require the `X-Admin-Token` header to match the configured
//! admin token. Without a configured token they are disabled.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{ClearResponse, StatsResponse};

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let expected = state
        .admin_token
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("admin endpoints are disabled".to_string()))?;

    let provided = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(AppError::Forbidden("invalid admin token".to_string())),
    }
}

/// Handler for DELETE /api/admin/cache
pub async fn clear_cache(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>> {
    require_admin(&state, &headers)?;

    let removed = state.cache.clear().await;
    info!(removed, "cache cleared by admin");

    Ok(Json(ClearResponse::new("Cache cleared", removed)))
}

/// Handler for GET /api/admin/cache/stats
pub async fn cache_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<StatsResponse>> {
    require_admin(&state, &headers)?;

    let stats = state.cache.store().read().await.stats();
    Ok(Json(StatsResponse::new(
        &stats,
        state.cache.profiler().snapshot(),
    )))
}

/// Handler for DELETE /api/admin/cache/stats
pub async fn reset_cache_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>> {
    require_admin(&state, &headers)?;

    state.cache.profiler().reset();
    state.cache.store().write().await.reset_stats();
    info!("cache statistics reset");

    Ok(Json(ClearResponse::new("Cache statistics reset", 0)))
}

/// Handler for GET /api/admin/cache/metrics.csv
pub async fn export_cache_metrics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    require_admin(&state, &headers)?;

    let csv = state.cache.profiler().export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"cache-metrics.csv\"",
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::MemoryRepository;
    use axum::http::HeaderValue;
    use std::sync::Arc;

    fn state_with_token(token: Option<&str>) -> AppState {
        let config = Config {
            admin_token: token.map(str::to_string),
            ..Config::default()
        };
        AppState::with_repository(&config, Arc::new(MemoryRepository::new()))
    }

    fn headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_str(token).unwrap());
        headers
    }

    #[test]
    fn test_require_admin() {
        let state = state_with_token(Some("s3cret"));

        assert!(require_admin(&state, &headers("s3cret")).is_ok());
        assert!(matches!(
            require_admin(&state, &headers("wrong")),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            require_admin(&state, &HeaderMap::new()),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_disabled_without_token() {
        let state = state_with_token(None);
        assert!(require_admin(&state, &headers("anything")).is_err());
    }

    #[tokio::test]
    async fn test_stats_reflect_profiler() {
        let state = state_with_token(Some("s3cret"));
        state
            .cache
            .profiler()
            .record_miss("inventory_list", std::time::Duration::from_micros(10));

        let response = cache_stats(State(state), headers("s3cret")).await.unwrap();
        assert_eq!(response.operations.len(), 1);
        assert_eq!(response.operations[0].operation, "inventory_list");
    }
}
