//! #  Order store interfaces
//!
//! Orders and carts belong to the host store. The engine reaches them only through these traits:
//!
//! * [`OrderManagement`] reads orders and writes their status and `_gate_invoice` metadata.
//! * [`CartManagement`] clears the buyer's cart and supplies the store's "thank you" URL.
mod cart_management;
mod order_management;

pub use cart_management::CartManagement;
pub use order_management::{OrderFilter, OrderManagement, OrderQuery};
