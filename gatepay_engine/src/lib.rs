//! GatePay Payment Engine
//!
//! The engine lets a store accept crypto payments through GatePay. It holds the invoice lifecycle: creating an invoice
//! for an order at checkout, recording it on the order, and later reconciling the order against the invoice state
//! that GatePay reports. It does not own orders or carts. Those belong to the host store and are reached through a
//! pair of narrow traits.
//!
//! The library is divided into two main sections:
//! 1. The store interfaces ([`mod@db`]). A store backend implements [`OrderManagement`] and [`CartManagement`].
//!    [`MemoryDatabase`] is an in-memory backend for tests and for running the server stand-alone. The data types
//!    exchanged with the store are defined in [`db_types`].
//! 2. The engine public API ([`mod@gp_api`]): [`InvoiceApi`], [`PaymentFlowApi`] and [`ReconciliationApi`]. Each is
//!    constructed with its store and a [`gatepay_tools::GatePayApi`] client.
pub mod db;

pub mod db_types;
pub mod gp_api;
pub mod helpers;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::{
    memory::{MemoryDatabase, MemoryDatabaseError, StoreOperation},
    traits::{CartManagement, OrderFilter, OrderManagement, OrderQuery},
};
pub use gp_api::{
    errors::{InvoiceError, PaymentFlowError, ReconciliationError},
    invoice_api::InvoiceApi,
    payment_flow_api::{PaymentFlowApi, AWAITING_PAYMENT_NOTE},
    payment_objects::{PaymentOutcome, PaymentResult, ReconciliationResult},
    reconciliation_api::{ReconciliationApi, DEFAULT_BATCH_SIZE, PAID_NOTE},
};
