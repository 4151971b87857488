use thiserror::Error;

use crate::db_types::OrderId;

#[derive(Debug, Clone, Error)]
pub enum MemoryDatabaseError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Could not empty the cart for order {0}: {1}")]
    CartError(OrderId, String),
}
