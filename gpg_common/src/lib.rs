//! Small building blocks shared by the GatePay gateway crates.
pub mod helpers;
mod secret;

pub use helpers::{parse_boolean_flag, utc_timestamp_millis};
pub use secret::Secret;
