//! # GatePay payment gateway server
//! This crate hosts the HTTP front end of the gateway. It is responsible for:
//! * Receiving order snapshots from the host store.
//! * Starting GatePay payments at checkout and telling the store where to send the buyer.
//! * Periodically reconciling orders that are on hold against their GatePay invoices.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /gateway`: The gateway title, description and IPN callback URL.
//! * `POST /orders`, `GET /orders/{order_id}`: Order snapshots pushed by the store.
//! * `POST /checkout/{order_id}`: Creates a GatePay invoice for the order.
//! * `POST /reconcile`: Runs one reconciliation pass immediately.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
