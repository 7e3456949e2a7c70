//! Order endpoints
//!
//! Orders are cached under `order_data`; summaries under `order_summary`.
//! Every write invalidates both.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::AppState;
use crate::cache::{count_key, entity_key, paginated_key};
use crate::error::{AppError, Result};
use crate::models::{
    CreateOrderRequest, DeleteResponse, ItemResponse, ListResponse, Order, OrderSummary,
    PageQuery, UpdateOrderStatusRequest,
};

/// Cache prefix of order records and pages.
pub const ORDER_PREFIX: &str = "order_data";
/// Cache prefix of order summaries.
pub const ORDER_SUMMARY_PREFIX: &str = "order_summary";

async fn invalidate_orders(state: &AppState, id: Option<u64>) -> usize {
    state.cache.invalidate(ORDER_PREFIX, id).await
        + state.cache.invalidate(ORDER_SUMMARY_PREFIX, id).await
}

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("order {}", id))
}

/// Handler for GET /api/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<Order>>> {
    let page = query.page();

    let repo = state.orders.clone();
    let orders = state
        .cache
        .get_or_fetch_data(
            "order_list",
            paginated_key(ORDER_PREFIX, page.skip, page.take),
            || async move { repo.list_orders(page).await },
        )
        .await?;

    let repo = state.orders.clone();
    let total = state
        .cache
        .get_or_fetch_count(
            "order_count",
            count_key(ORDER_PREFIX, &[]),
            || async move { repo.count_orders().await },
        )
        .await?;

    Ok(Json(ListResponse::new(orders.source, orders.value, total.value, page)))
}

/// Handler for GET /api/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ItemResponse<Order>>> {
    let repo = state.orders.clone();
    let order = state
        .cache
        .get_or_fetch_data("order_get", entity_key(ORDER_PREFIX, id), || async move {
            repo.get_order(id).await?.ok_or_else(|| not_found(id))
        })
        .await?;

    Ok(Json(ItemResponse::new(order.source, order.value)))
}

/// Handler for GET /api/orders/:id/summary
pub async fn get_order_summary(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ItemResponse<OrderSummary>>> {
    let repo = state.orders.clone();
    let summary = state
        .cache
        .get_or_fetch_data(
            "order_summary",
            entity_key(ORDER_SUMMARY_PREFIX, id),
            || async move {
                let order = repo.get_order(id).await?.ok_or_else(|| not_found(id))?;
                Ok(OrderSummary::from(&order))
            },
        )
        .await?;

    Ok(Json(ItemResponse::new(summary.source, summary.value)))
}

/// Handler for POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let order = state.orders.create_order(req).await?;
    let removed = invalidate_orders(&state, None).await;
    info!(id = order.id, removed, "order created");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Handler for PUT /api/orders/:id/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateOrderStatusRequest>,
) -> Result<Json<Order>> {
    let order = state
        .orders
        .update_order_status(id, req.status)
        .await?
        .ok_or_else(|| not_found(id))?;
    let removed = invalidate_orders(&state, Some(id)).await;
    info!(id, status = ?order.status, removed, "order status updated");

    Ok(Json(order))
}

/// Handler for DELETE /api/orders/:id
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    if !state.orders.delete_order(id).await? {
        return Err(not_found(id));
    }
    let removed = invalidate_orders(&state, Some(id)).await;
    info!(id, removed, "order deleted");

    Ok(Json(DeleteResponse::new("Order", id)))
}
