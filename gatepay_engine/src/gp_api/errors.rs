use thiserror::Error;

use crate::db_types::OrderId;

/// Why an invoice could not be created. The `Display` text is shown to the buyer as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvoiceError {
    #[error("Merchant user ID or the Client ID is not set by the admin.")]
    MissingMerchantConfiguration,
    #[error("The GatePay payment key is not set by the admin.")]
    MissingPaymentKey,
    #[error("No chain available for the currency: {0}")]
    UnsupportedCurrency(String),
    #[error("{0}")]
    RemoteRejection(String),
    /// GatePay could not be reached or gave no usable answer. The detail is kept for the logs only.
    #[error("The payment could not be initiated. Please try again later.")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Database error: {0}")]
    StoreError(String),
    #[error("{0}")]
    InvoiceError(#[from] InvoiceError),
}

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("Database error: {0}")]
    StoreError(String),
}
