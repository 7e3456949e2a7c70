//! API Routes
//!
//! Configures the Axum router with every logistics endpoint.

use axum::{
    http::Uri,
    middleware,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::admin::{cache_stats, clear_cache, export_cache_metrics, reset_cache_stats};
use super::handlers::{health_handler, AppState};
use super::inventory::{
    create_inventory_item, delete_inventory_item, get_inventory_item, list_inventory,
    search_inventory, update_inventory_item,
};
use super::orders::{
    create_order, delete_order, get_order, get_order_summary, list_orders, update_order_status,
};
use crate::error::AppError;
use crate::rate_limit::rate_limit_middleware;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Rate limiting: applies to protected paths only, including paths
///   that fall through to the 404 fallback
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let inventory = Router::new()
        .route("/", get(list_inventory).post(create_inventory_item))
        .route("/search", get(search_inventory))
        .route(
            "/:id",
            get(get_inventory_item)
                .put(update_inventory_item)
                .delete(delete_inventory_item),
        );

    let orders = Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).delete(delete_order))
        .route("/:id/summary", get(get_order_summary))
        .route("/:id/status", put(update_order_status));

    let admin = Router::new()
        .route("/cache", axum::routing::delete(clear_cache))
        .route("/cache/stats", get(cache_stats).delete(reset_cache_stats))
        .route("/cache/metrics.csv", get(export_cache_metrics));

    Router::new()
        .nest("/api/inventory", inventory)
        .nest("/api/orders", orders)
        .nest("/api/admin", admin)
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::MemoryRepository;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let repo = Arc::new(MemoryRepository::with_sample_data().await.unwrap());
        create_router(AppState::with_repository(&Config::default(), repo))
    }

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;
        assert_eq!(status_of(app, "GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_inventory_routes() {
        let app = create_test_app().await;

        assert_eq!(
            status_of(app.clone(), "GET", "/api/inventory").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app.clone(), "GET", "/api/inventory/search?name=pallet").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app.clone(), "GET", "/api/inventory/1").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app, "GET", "/api/inventory/999").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_order_routes() {
        let app = create_test_app().await;

        assert_eq!(
            status_of(app.clone(), "GET", "/api/orders").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(app, "GET", "/api/orders/1/summary").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_unknown_route_falls_back_to_404() {
        let app = create_test_app().await;
        assert_eq!(
            status_of(app, "GET", "/nope").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_admin_forbidden_without_token() {
        let app = create_test_app().await;
        assert_eq!(
            status_of(app, "GET", "/api/admin/cache/stats").await,
            StatusCode::FORBIDDEN
        );
    }
}
