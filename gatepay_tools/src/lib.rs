//! A client for the GatePay open-platform API.
//!
//! [`GatePayApi`] signs every request (see [`signer`]), optionally caches successful responses
//! (see [`ResponseCache`]) and decodes the three endpoints the gateway needs into [`GatePayResponse`] values.
mod api;
mod cache;
mod config;
mod data_objects;
mod error;

pub mod helpers;
pub mod signer;

pub use api::{
    GatePayApi,
    CHAINS_PATH,
    CHECKOUT_ORDER_PATH,
    HEADER_CLIENT_ID,
    HEADER_NONCE,
    HEADER_SIGNATURE,
    HEADER_TIMESTAMP,
    ORDER_QUERY_PATH,
};
pub use cache::ResponseCache;
pub use config::{Credentials, GatePayConfig, DEFAULT_CACHE_TTL, DEFAULT_GATEPAY_API_URL, DEFAULT_GATEWAY_ID};
pub use data_objects::{Chain, GatePayResponse, Goods, Invoice, InvoiceRequest, InvoiceStatus, TerminalEnv};
pub use error::GatePayApiError;
pub use signer::RequestSigner;
