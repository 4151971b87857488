//! # GatePay engine public API
//!
//! * [`invoice_api`] builds and submits GatePay invoices for store orders.
//! * [`payment_flow_api`] is the checkout entry point. It ties a new invoice to the order status and decides where the
//!   buyer goes next.
//! * [`reconciliation_api`] polls GatePay for orders awaiting payment and completes or releases them.
//!
//! # API usage
//!
//! Every API is created from a store that implements the traits it needs, plus a [`GatePayApi`] client. Clones of the
//! client share the connection pool and response cache, so one client can back every API.
//!
//! ```rust,ignore
//! use gatepay_engine::{MemoryDatabase, InvoiceApi, PaymentFlowApi, ReconciliationApi};
//! let client = GatePayApi::new(GatePayConfig::new_from_env_or_default())?;
//! let db = MemoryDatabase::new("https://shop.example/");
//! let checkout = PaymentFlowApi::new(db.clone(), InvoiceApi::new(client.clone()));
//! let outcome = checkout.process_payment(&"1042".into()).await?;
//! let summary = ReconciliationApi::new(db, client).reconcile_pending_orders().await?;
//! ```
//!
//! [`GatePayApi`]: gatepay_tools::GatePayApi

pub mod errors;
pub mod invoice_api;
pub mod payment_flow_api;
pub mod payment_objects;
pub mod reconciliation_api;
