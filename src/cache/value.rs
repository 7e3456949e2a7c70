//! Cached value shapes
//!
//! The store holds one tagged union; each read site names the shape it
//! expects and a mismatch reads as a miss.

use crate::models::{InventoryItem, Order, OrderSummary};

/// Every shape the tracker caches.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    InventoryPage(Vec<InventoryItem>),
    InventoryItem(InventoryItem),
    OrderPage(Vec<Order>),
    Order(Order),
    OrderSummary(OrderSummary),
    Count(u64),
}

/// Conversion between a concrete value and its [`CachedValue`] variant.
pub trait CachedShape: Sized {
    fn into_cached(self) -> CachedValue;
    /// Copies the value out when `value` is this shape's variant.
    fn from_cached(value: &CachedValue) -> Option<Self>;
}

macro_rules! cached_shape {
    ($ty:ty, $variant:ident) => {
        impl CachedShape for $ty {
            fn into_cached(self) -> CachedValue {
                CachedValue::$variant(self)
            }

            fn from_cached(value: &CachedValue) -> Option<Self> {
                match value {
                    CachedValue::$variant(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }
    };
}

cached_shape!(Vec<InventoryItem>, InventoryPage);
cached_shape!(InventoryItem, InventoryItem);
cached_shape!(Vec<Order>, OrderPage);
cached_shape!(Order, Order);
cached_shape!(OrderSummary, OrderSummary);
cached_shape!(u64, Count);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_round_trips_through_union() {
        let cached = 42u64.into_cached();
        assert_eq!(cached, CachedValue::Count(42));
        assert_eq!(u64::from_cached(&cached), Some(42));
    }

    #[test]
    fn test_shape_mismatch_is_none() {
        let cached = CachedValue::Count(3);
        assert_eq!(Vec::<InventoryItem>::from_cached(&cached), None);
    }
}
