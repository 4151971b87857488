use async_trait::async_trait;

use crate::db_types::{Order, OrderId};

/// Checkout-session operations of the host store.
#[async_trait]
pub trait CartManagement: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    /// Clears the buyer's active cart once the order is waiting on its invoice.
    async fn empty_cart(&self, order_id: &OrderId) -> Result<(), Self::Error>;

    /// The store's generic "thank you" page for the order.
    fn return_url(&self, order: &Order) -> String;
}
