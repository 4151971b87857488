use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use log::*;
use tokio::sync::RwLock;

use super::MemoryDatabaseError;
use crate::{
    db::traits::{CartManagement, OrderManagement, OrderQuery},
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
};

const DEFAULT_SITE_URL: &str = "http://localhost/";

/// A write made through one of the store traits, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    UpsertOrder(OrderId),
    SetInvoice(OrderId, String),
    ClearInvoice(OrderId),
    UpdateStatus(OrderId, OrderStatusType),
    EmptyCart(OrderId),
}

#[derive(Default)]
struct Store {
    orders: HashMap<OrderId, Order>,
    operations: Vec<StoreOperation>,
    cart_failure: Option<String>,
}

/// A thread-safe in-memory order store.
///
/// It stands in for the host store in tests and in the standalone server, and keeps a journal of every write so that
/// the sequencing of side effects can be checked.
#[derive(Clone)]
pub struct MemoryDatabase {
    site_url: String,
    store: Arc<RwLock<Store>>,
}

impl Debug for MemoryDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MemoryDatabase ({})", self.site_url)
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL)
    }
}

impl MemoryDatabase {
    pub fn new(site_url: &str) -> Self {
        Self { site_url: site_url.trim_end_matches('/').to_string(), store: Arc::new(RwLock::new(Store::default())) }
    }

    /// Makes every subsequent `empty_cart` call fail with `reason`. Pass `None` to restore normal behaviour.
    pub async fn set_cart_failure(&self, reason: Option<&str>) {
        self.store.write().await.cart_failure = reason.map(String::from);
    }

    pub async fn operations(&self) -> Vec<StoreOperation> {
        self.store.read().await.operations.clone()
    }

    /// The orders whose carts have been emptied, oldest first.
    pub async fn cleared_carts(&self) -> Vec<OrderId> {
        self.store
            .read()
            .await
            .operations
            .iter()
            .filter_map(|op| match op {
                StoreOperation::EmptyCart(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn order_count(&self) -> usize {
        self.store.read().await.orders.len()
    }

    async fn modify<F>(&self, order_id: &OrderId, op: StoreOperation, f: F) -> Result<Order, MemoryDatabaseError>
    where F: FnOnce(&mut Order) {
        let mut store = self.store.write().await;
        let order = store.orders.get_mut(order_id).ok_or_else(|| MemoryDatabaseError::OrderNotFound(order_id.clone()))?;
        f(order);
        order.updated_at = Utc::now();
        let result = order.clone();
        store.operations.push(op);
        Ok(result)
    }

    /// Applies `f` only if the order currently carries `prepay_id`. The check and the write happen under one lock.
    async fn modify_if_invoice<F>(
        &self,
        order_id: &OrderId,
        prepay_id: &str,
        op: StoreOperation,
        f: F,
    ) -> Result<Option<Order>, MemoryDatabaseError>
    where F: FnOnce(&mut Order) {
        let mut store = self.store.write().await;
        let order = store.orders.get_mut(order_id).ok_or_else(|| MemoryDatabaseError::OrderNotFound(order_id.clone()))?;
        if order.invoice() != Some(prepay_id) {
            trace!("🗃️ Order {order_id} no longer carries invoice {prepay_id}. Leaving it alone");
            return Ok(None);
        }
        f(order);
        order.updated_at = Utc::now();
        let result = order.clone();
        store.operations.push(op);
        Ok(Some(result))
    }
}

#[async_trait]
impl OrderManagement for MemoryDatabase {
    type Error = MemoryDatabaseError;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, Self::Error> {
        Ok(self.store.read().await.orders.get(order_id).cloned())
    }

    async fn fetch_orders(&self, query: OrderQuery) -> Result<Vec<Order>, Self::Error> {
        let store = self.store.read().await;
        let mut orders = store.orders.values().filter(|o| query.matches(o)).cloned().collect::<Vec<_>>();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = query.limit {
            orders.truncate(limit);
        }
        trace!("🗃️ {} orders match the query. {query}", orders.len());
        Ok(orders)
    }

    async fn set_invoice(&self, order_id: &OrderId, prepay_id: &str) -> Result<Order, Self::Error> {
        let op = StoreOperation::SetInvoice(order_id.clone(), prepay_id.to_string());
        let order = self.modify(order_id, op, |o| o.invoice = Some(prepay_id.to_string())).await?;
        debug!("🗃️ Order {order_id} now carries invoice {prepay_id}");
        Ok(order)
    }

    async fn clear_invoice(&self, order_id: &OrderId, prepay_id: &str) -> Result<Option<Order>, Self::Error> {
        let op = StoreOperation::ClearInvoice(order_id.clone());
        let order = self.modify_if_invoice(order_id, prepay_id, op, |o| o.invoice = None).await?;
        if order.is_some() {
            debug!("🗃️ Invoice {prepay_id} cleared from order {order_id}");
        }
        Ok(order)
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatusType,
        note: &str,
    ) -> Result<Order, Self::Error> {
        let op = StoreOperation::UpdateStatus(order_id.clone(), status);
        let order = self
            .modify(order_id, op, |o| {
                o.status = status;
                if !note.is_empty() {
                    o.notes.push(note.to_string());
                }
            })
            .await?;
        debug!("🗃️ Order {order_id} is now {status}");
        Ok(order)
    }

    async fn update_status_for_invoice(
        &self,
        order_id: &OrderId,
        prepay_id: &str,
        status: OrderStatusType,
        note: &str,
    ) -> Result<Option<Order>, Self::Error> {
        let op = StoreOperation::UpdateStatus(order_id.clone(), status);
        let order = self
            .modify_if_invoice(order_id, prepay_id, op, |o| {
                o.status = status;
                if !note.is_empty() {
                    o.notes.push(note.to_string());
                }
            })
            .await?;
        if order.is_some() {
            debug!("🗃️ Order {order_id} is now {status}");
        }
        Ok(order)
    }

    async fn upsert_order(&self, order: NewOrder) -> Result<Order, Self::Error> {
        let mut store = self.store.write().await;
        let now = Utc::now();
        let id = order.id.clone();
        let result = match store.orders.get_mut(&id) {
            Some(existing) => {
                existing.currency = order.currency;
                existing.total = order.total;
                existing.items = order.items;
                if let Some(status) = order.status {
                    existing.status = status;
                }
                existing.updated_at = now;
                existing.clone()
            },
            None => {
                let new_order = Order {
                    id: id.clone(),
                    currency: order.currency,
                    total: order.total,
                    items: order.items,
                    status: order.status.unwrap_or_default(),
                    invoice: None,
                    notes: Vec::new(),
                    created_at: now,
                    updated_at: now,
                };
                store.orders.insert(id.clone(), new_order.clone());
                new_order
            },
        };
        store.operations.push(StoreOperation::UpsertOrder(id));
        debug!("🗃️ Order {} saved", result.id);
        Ok(result)
    }
}

#[async_trait]
impl CartManagement for MemoryDatabase {
    type Error = MemoryDatabaseError;

    async fn empty_cart(&self, order_id: &OrderId) -> Result<(), Self::Error> {
        let mut store = self.store.write().await;
        if let Some(reason) = &store.cart_failure {
            return Err(MemoryDatabaseError::CartError(order_id.clone(), reason.clone()));
        }
        store.operations.push(StoreOperation::EmptyCart(order_id.clone()));
        trace!("🗃️ Cart emptied for order {order_id}");
        Ok(())
    }

    fn return_url(&self, order: &Order) -> String {
        format!("{}/checkout/order-received/{}/", self.site_url, order.id.as_str())
    }
}
