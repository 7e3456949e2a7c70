//! Repository Module
//!
//! Backend the read-through cache sits in front of. Handlers only see the
//! traits; `MemoryRepository` keeps everything in process.

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    CreateOrderRequest, InventoryFilter, InventoryItem, InventoryRequest, Order, OrderStatus,
    Page,
};

pub use memory::MemoryRepository;

/// Inventory persistence.
///
/// Must return the same answer for the same arguments while no write
/// happens in between.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// One page of items matching `filter`, ordered by id.
    async fn list_items(&self, filter: &InventoryFilter, page: Page) -> Result<Vec<InventoryItem>>;

    /// Number of items matching `filter`.
    async fn count_items(&self, filter: &InventoryFilter) -> Result<u64>;

    async fn get_item(&self, id: u64) -> Result<Option<InventoryItem>>;

    async fn create_item(&self, request: InventoryRequest) -> Result<InventoryItem>;

    /// Replaces an item. `None` if it does not exist.
    async fn update_item(&self, id: u64, request: InventoryRequest)
        -> Result<Option<InventoryItem>>;

    /// Returns whether an item was deleted.
    async fn delete_item(&self, id: u64) -> Result<bool>;
}

/// Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// One page of orders, ordered by id.
    async fn list_orders(&self, page: Page) -> Result<Vec<Order>>;

    async fn count_orders(&self) -> Result<u64>;

    async fn get_order(&self, id: u64) -> Result<Option<Order>>;

    /// Creates an order. Fails with `InvalidRequest` if a line names an
    /// unknown inventory item.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order>;

    async fn update_order_status(&self, id: u64, status: OrderStatus) -> Result<Option<Order>>;

    async fn delete_order(&self, id: u64) -> Result<bool>;
}
