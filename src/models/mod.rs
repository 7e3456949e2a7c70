//! Domain records and the request/response models of the tracker API
//!
//! This module defines the records handled by the backend and the DTOs
//! used for serializing/deserializing HTTP request and response bodies.

pub mod inventory;
pub mod order;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use inventory::{InventoryFilter, InventoryItem};
pub use order::{Order, OrderLine, OrderStatus, OrderSummary};
pub use requests::{
    CreateOrderRequest, InventoryRequest, Page, PageQuery, SearchQuery, UpdateOrderStatusRequest,
};
pub use responses::{
    ClearResponse, DeleteResponse, HealthResponse, ItemResponse, ListResponse,
    RateLimitedResponse, StatsResponse, RATE_LIMIT_MESSAGE,
};
