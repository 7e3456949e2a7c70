//! Inventory records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stock-keeping record at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub location: String,
    pub updated_at: DateTime<Utc>,
}

/// Filter applied by inventory search.
///
/// `name` matches case-insensitively as a substring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub name: Option<String>,
    pub min_quantity: Option<u32>,
}

impl InventoryFilter {
    /// Returns true if the item passes every set criterion.
    pub fn matches(&self, item: &InventoryItem) -> bool {
        let name_ok = match &self.name {
            Some(needle) => item
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            None => true,
        };
        let quantity_ok = self.min_quantity.map_or(true, |min| item.quantity >= min);
        name_ok && quantity_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: u32) -> InventoryItem {
        InventoryItem {
            id: 1,
            name: name.to_string(),
            sku: "SKU-1".to_string(),
            quantity,
            location: "A1".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_empty_matches_all() {
        assert!(InventoryFilter::default().matches(&item("Pallet", 0)));
    }

    #[test]
    fn test_filter_name_case_insensitive() {
        let filter = InventoryFilter {
            name: Some("pALLet".to_string()),
            min_quantity: None,
        };
        assert!(filter.matches(&item("Wooden Pallet", 3)));
        assert!(!filter.matches(&item("Crate", 3)));
    }

    #[test]
    fn test_filter_min_quantity() {
        let filter = InventoryFilter {
            name: None,
            min_quantity: Some(10),
        };
        assert!(filter.matches(&item("Crate", 10)));
        assert!(!filter.matches(&item("Crate", 9)));
    }
}
