//! Request DTOs for the tracker API
//!
//! Defines query strings and bodies accepted by the HTTP handlers.

use serde::Deserialize;

use crate::models::{InventoryFilter, OrderLine, OrderStatus};

// == Limits ==
/// Page size used when `take` is absent.
pub const DEFAULT_TAKE: u32 = 50;
/// Largest page a client may request; larger values are clamped.
pub const MAX_TAKE: u32 = 100;
/// Longest accepted name filter.
pub const MAX_NAME_FILTER_LENGTH: usize = 100;

/// Resolved pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub take: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            take: DEFAULT_TAKE,
        }
    }
}

/// Query string of paginated list endpoints (`?skip=&take=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub take: Option<u32>,
}

impl PageQuery {
    /// Resolves defaults and clamps `take` into `1..=MAX_TAKE`.
    pub fn page(&self) -> Page {
        Page {
            skip: self.skip.unwrap_or(0),
            take: self.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE),
        }
    }
}

/// Query string of the inventory search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min_quantity: Option<u32>,
    #[serde(default)]
    pub skip: Option<u64>,
    #[serde(default)]
    pub take: Option<u32>,
}

impl SearchQuery {
    /// Validates the filters.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        match &self.name {
            Some(name) if name.chars().count() > MAX_NAME_FILTER_LENGTH => Some(format!(
                "name filter exceeds maximum length of {} characters",
                MAX_NAME_FILTER_LENGTH
            )),
            _ => None,
        }
    }

    /// Returns the filter part of the query; a blank name means no name filter.
    pub fn filter(&self) -> InventoryFilter {
        InventoryFilter {
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            min_quantity: self.min_quantity,
        }
    }

    pub fn page(&self) -> Page {
        PageQuery {
            skip: self.skip,
            take: self.take,
        }
        .page()
    }
}

/// Body of `POST /api/inventory` and `PUT /api/inventory/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryRequest {
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    #[serde(default)]
    pub location: String,
}

impl InventoryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("name cannot be empty".to_string());
        }
        if self.name.chars().count() > MAX_NAME_FILTER_LENGTH {
            return Some(format!(
                "name exceeds maximum length of {} characters",
                MAX_NAME_FILTER_LENGTH
            ));
        }
        if self.sku.trim().is_empty() {
            return Some("sku cannot be empty".to_string());
        }
        None
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer: String,
    pub destination: String,
    pub lines: Vec<OrderLine>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Option<String> {
        if self.customer.trim().is_empty() {
            return Some("customer cannot be empty".to_string());
        }
        if self.lines.is_empty() {
            return Some("an order needs at least one line".to_string());
        }
        if self.lines.iter().any(|l| l.quantity == 0) {
            return Some("line quantity must be positive".to_string());
        }
        None
    }
}

/// Body of `PUT /api/orders/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
