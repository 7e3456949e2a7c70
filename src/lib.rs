//! Logitrack - a logistics tracker API
//!
//! Inventory and order endpoints served through a read-through cache, with
//! fixed-window rate limiting of sensitive paths.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod repository;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
