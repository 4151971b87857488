use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatePayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("No payment key is configured, so the request cannot be signed")]
    MissingPaymentKey,
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The response was missing '{0}'")]
    MalformedResponse(String),
}

impl GatePayApiError {
    /// True for failures that happened before or during transport, as opposed to responses we could not make sense of.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::RestRequestError(_) | Self::RestResponseError(_))
    }
}
