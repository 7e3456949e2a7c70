//! Inventory endpoints
//!
//! Reads go through the read-through cache; writes hit the repository and
//! then invalidate the `inventory` prefix.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::api::AppState;
use crate::cache::{count_key, entity_key, paginated_key, Fetched};
use crate::error::{AppError, Result};
use crate::models::{
    DeleteResponse, InventoryFilter, InventoryItem, InventoryRequest, ItemResponse, ListResponse,
    PageQuery, SearchQuery,
};

/// Cache prefix of every inventory key.
pub const INVENTORY_PREFIX: &str = "inventory";

/// Renders an optional filter value as a key part.
fn key_part<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "any".to_string(), |v| v.to_string())
}

/// Cached total of items matching `filter`.
async fn cached_total(state: &AppState, filter: &InventoryFilter) -> Result<Fetched<u64>> {
    let key = if *filter == InventoryFilter::default() {
        count_key(INVENTORY_PREFIX, &[])
    } else {
        count_key(
            INVENTORY_PREFIX,
            &[
                &"name",
                &key_part(filter.name.as_deref()),
                &"min",
                &key_part(filter.min_quantity),
            ],
        )
    };

    let repo = state.inventory.clone();
    let filter = filter.clone();
    state
        .cache
        .get_or_fetch_count("inventory_count", key, || async move {
            repo.count_items(&filter).await
        })
        .await
}

/// Handler for GET /api/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<InventoryItem>>> {
    let page = query.page();
    let key = paginated_key(INVENTORY_PREFIX, page.skip, page.take);

    let repo = state.inventory.clone();
    let items = state
        .cache
        .get_or_fetch_data("inventory_list", key, || async move {
            repo.list_items(&InventoryFilter::default(), page).await
        })
        .await?;
    let total = cached_total(&state, &InventoryFilter::default()).await?;

    Ok(Json(ListResponse::new(items.source, items.value, total.value, page)))
}

/// Handler for GET /api/inventory/search
pub async fn search_inventory(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<InventoryItem>>> {
    if let Some(error_msg) = query.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let page = query.page();
    let filter = query.filter();
    let key = crate::cache_key!(
        INVENTORY_PREFIX,
        "search",
        "name",
        key_part(filter.name.as_deref()),
        "min",
        key_part(filter.min_quantity),
        "skip",
        page.skip,
        "take",
        page.take
    );

    let repo = state.inventory.clone();
    let search_filter = filter.clone();
    let items = state
        .cache
        .get_or_fetch_data("inventory_search", key, || async move {
            repo.list_items(&search_filter, page).await
        })
        .await?;
    let total = cached_total(&state, &filter).await?;

    Ok(Json(ListResponse::new(items.source, items.value, total.value, page)))
}

/// Handler for GET /api/inventory/:id
pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ItemResponse<InventoryItem>>> {
    let repo = state.inventory.clone();
    let item = state
        .cache
        .get_or_fetch_data("inventory_get", entity_key(INVENTORY_PREFIX, id), || async move {
            repo.get_item(id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("inventory item {}", id)))
        })
        .await?;

    Ok(Json(ItemResponse::new(item.source, item.value)))
}

/// Handler for POST /api/inventory
pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(req): Json<InventoryRequest>,
) -> Result<(StatusCode, Json<InventoryItem>)> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let item = state.inventory.create_item(req).await?;
    let removed = state.cache.invalidate(INVENTORY_PREFIX, None).await;
    info!(id = item.id, removed, "inventory item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /api/inventory/:id
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<InventoryRequest>,
) -> Result<Json<InventoryItem>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let item = state
        .inventory
        .update_item(id, req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("inventory item {}", id)))?;
    let removed = state.cache.invalidate(INVENTORY_PREFIX, Some(id)).await;
    info!(id, removed, "inventory item updated");

    Ok(Json(item))
}

/// Handler for DELETE /api/inventory/:id
pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteResponse>> {
    if !state.inventory.delete_item(id).await? {
        return Err(AppError::NotFound(format!("inventory item {}", id)));
    }
    let removed = state.cache.invalidate(INVENTORY_PREFIX, Some(id)).await;
    info!(id, removed, "inventory item deleted");

    Ok(Json(DeleteResponse::new("Inventory item", id)))
}
