//! API Module
//!
//! HTTP handlers and routing for the logistics REST API.
//!
//! # Endpoints
//! - `/api/inventory` - Inventory listing, search and CRUD
//! - `/api/orders` - Orders, order summaries and status updates
//! - `/api/admin/cache` - Cache clearing, statistics and CSV export
//! - `GET /health` - Health check endpoint

pub mod admin;
pub mod handlers;
pub mod inventory;
pub mod orders;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
