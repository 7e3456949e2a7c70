//! In-process repository

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{
    CreateOrderRequest, InventoryFilter, InventoryItem, InventoryRequest, Order, OrderLine,
    OrderStatus, Page,
};
use crate::repository::{InventoryRepository, OrderRepository};

#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn paginate<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.skip as usize).take(page.take as usize).collect()
}

/// Inventory and orders held in `BTreeMap`s, ids assigned sequentially from 1.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    inventory: RwLock<Table<InventoryItem>>,
    orders: RwLock<Table<Order>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository preloaded with a few warehouses' worth of stock and orders.
    pub async fn with_sample_data() -> Result<Self> {
        let repo = Self::new();
        let stock = [
            ("Euro pallet", "PAL-EUR-01", 240, "Rotterdam DC"),
            ("Shipping crate, large", "CRT-L-02", 85, "Rotterdam DC"),
            ("Shipping crate, small", "CRT-S-03", 310, "Hamburg DC"),
            ("Stretch film roll", "FLM-500-04", 1200, "Hamburg DC"),
            ("Cold-chain container", "CCC-20-05", 12, "Antwerp Port"),
        ];
        for (name, sku, quantity, location) in stock {
            repo.create_item(InventoryRequest {
                name: name.to_string(),
                sku: sku.to_string(),
                quantity,
                location: location.to_string(),
            })
            .await?;
        }

        repo.create_order(CreateOrderRequest {
            customer: "Nordic Retail AB".to_string(),
            destination: "Gothenburg".to_string(),
            lines: vec![
                OrderLine { item_id: 1, quantity: 20 },
                OrderLine { item_id: 4, quantity: 40 },
            ],
        })
        .await?;

        Ok(repo)
    }
}

#[async_trait]
impl InventoryRepository for MemoryRepository {
    async fn list_items(&self, filter: &InventoryFilter, page: Page) -> Result<Vec<InventoryItem>> {
        let table = self.inventory.read().await;
        let matching = table.rows.values().filter(|item| filter.matches(item)).cloned();
        Ok(paginate(matching, page))
    }

    async fn count_items(&self, filter: &InventoryFilter) -> Result<u64> {
        let table = self.inventory.read().await;
        Ok(table.rows.values().filter(|item| filter.matches(item)).count() as u64)
    }

    async fn get_item(&self, id: u64) -> Result<Option<InventoryItem>> {
        Ok(self.inventory.read().await.rows.get(&id).cloned())
    }

    async fn create_item(&self, request: InventoryRequest) -> Result<InventoryItem> {
        let mut table = self.inventory.write().await;
        let item = InventoryItem {
            id: table.allocate_id(),
            name: request.name,
            sku: request.sku,
            quantity: request.quantity,
            location: request.location,
            updated_at: Utc::now(),
        };
        table.rows.insert(item.id, item.clone());
        debug!(id = item.id, "inventory item created");
        Ok(item)
    }

    async fn update_item(
        &self,
        id: u64,
        request: InventoryRequest,
    ) -> Result<Option<InventoryItem>> {
        let mut table = self.inventory.write().await;
        let Some(item) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        item.name = request.name;
        item.sku = request.sku;
        item.quantity = request.quantity;
        item.location = request.location;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: u64) -> Result<bool> {
        Ok(self.inventory.write().await.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for MemoryRepository {
    async fn list_orders(&self, page: Page) -> Result<Vec<Order>> {
        let table = self.orders.read().await;
        Ok(paginate(table.rows.values().cloned(), page))
    }

    async fn count_orders(&self) -> Result<u64> {
        Ok(self.orders.read().await.rows.len() as u64)
    }

    async fn get_order(&self, id: u64) -> Result<Option<Order>> {
        Ok(self.orders.read().await.rows.get(&id).cloned())
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order> {
        {
            let inventory = self.inventory.read().await;
            if let Some(line) = request
                .lines
                .iter()
                .find(|line| !inventory.rows.contains_key(&line.item_id))
            {
                return Err(AppError::InvalidRequest(format!(
                    "unknown inventory item {}",
                    line.item_id
                )));
            }
        }

        let mut table = self.orders.write().await;
        let now = Utc::now();
        let order = Order {
            id: table.allocate_id(),
            customer: request.customer,
            destination: request.destination,
            status: OrderStatus::Pending,
            lines: request.lines,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(order.id, order.clone());
        debug!(id = order.id, "order created");
        Ok(order)
    }

    async fn update_order_status(&self, id: u64, status: OrderStatus) -> Result<Option<Order>> {
        let mut table = self.orders.write().await;
        let Some(order) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: u64) -> Result<bool> {
        Ok(self.orders.write().await.rows.remove(&id).is_some())
    }
}
