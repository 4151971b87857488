use std::{fmt::Display, sync::Arc};

use async_trait::async_trait;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatusType};

/// An extra predicate applied to candidate orders in [`OrderManagement::fetch_orders`].
pub type OrderFilter = Arc<dyn Fn(&Order) -> bool + Send + Sync>;

/// Selects orders from the store. The status and filter are applied first, then the limit.
#[derive(Clone, Default)]
pub struct OrderQuery {
    pub status: Option<OrderStatusType>,
    pub limit: Option<usize>,
    pub filter: Option<OrderFilter>,
}

impl OrderQuery {
    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where F: Fn(&Order) -> bool + Send + Sync + 'static {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |s| order.status == s) && self.filter.as_ref().map_or(true, |f| f(order))
    }
}

impl Display for OrderQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "status: {status}. ")?,
            None => write!(f, "any status. ")?,
        }
        if let Some(limit) = self.limit {
            write!(f, "limit: {limit}. ")?;
        }
        if self.filter.is_some() {
            write!(f, "filtered.")?;
        }
        Ok(())
    }
}

/// The `OrderManagement` trait defines the narrow view the engine has of the host store's orders.
///
/// The engine reads totals, items and currency, and writes only the order status and the `_gate_invoice` metadata.
#[async_trait]
pub trait OrderManagement: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, Self::Error>;

    async fn fetch_orders(&self, query: OrderQuery) -> Result<Vec<Order>, Self::Error>;

    /// Records `prepay_id` as the order's current invoice, replacing any previous one.
    async fn set_invoice(&self, order_id: &OrderId, prepay_id: &str) -> Result<Order, Self::Error>;

    /// Removes the invoice reference, but only while the order still carries `prepay_id`.
    ///
    /// Returns `None`, and changes nothing, when the order has since been given a different invoice (or none).
    async fn clear_invoice(&self, order_id: &OrderId, prepay_id: &str) -> Result<Option<Order>, Self::Error>;

    /// Changes the order status and attaches `note` to the order history.
    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatusType,
        note: &str,
    ) -> Result<Order, Self::Error>;

    /// As [`OrderManagement::update_status`], but only while the order still carries `prepay_id` as its invoice.
    /// Returns `None`, and changes nothing, otherwise.
    async fn update_status_for_invoice(
        &self,
        order_id: &OrderId,
        prepay_id: &str,
        status: OrderStatusType,
        note: &str,
    ) -> Result<Option<Order>, Self::Error>;

    async fn upsert_order(&self, order: NewOrder) -> Result<Order, Self::Error>;
}
