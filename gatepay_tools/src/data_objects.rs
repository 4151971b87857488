use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::GatePayApiError;

pub const STATUS_SUCCESS: &str = "SUCCESS";

//--------------------------------------     GatePayResponse     ---------------------------------------------------------
/// The outcome of a call that reached GatePay and returned JSON.
///
/// GatePay wraps every payload in `{status, code, errorMessage, data}`. A `status` other than `SUCCESS` is a
/// rejection. A missing `status` is treated as success, and the payload is then decoded from `data`.
#[derive(Debug, Clone, PartialEq)]
pub enum GatePayResponse<T> {
    Success(T),
    Rejected { status: String, message: String },
}

impl<T> GatePayResponse<T> {
    pub fn from_value<F>(value: &Value, extract: F) -> Result<Self, GatePayApiError>
    where F: FnOnce(&Value) -> Result<T, GatePayApiError> {
        if let Some(status) = value["status"].as_str() {
            if status != STATUS_SUCCESS {
                let message = value["errorMessage"]
                    .as_str()
                    .or_else(|| value["label"].as_str())
                    .filter(|m| !m.is_empty())
                    .unwrap_or(status)
                    .to_string();
                return Ok(Self::Rejected { status: status.to_string(), message });
            }
        }
        let data = &value["data"];
        if data.is_null() {
            return Err(GatePayApiError::MalformedResponse("data".into()));
        }
        extract(data).map(Self::Success)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

//--------------------------------------          Chain          ---------------------------------------------------------
/// The settlement network GatePay should route a payment through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub chain: String,
    pub full_curr_type: String,
}

impl Chain {
    pub fn new(chain: &str, full_curr_type: &str) -> Self {
        Self { chain: chain.to_string(), full_curr_type: full_curr_type.to_string() }
    }

    pub(crate) fn list_from_data(data: &Value) -> Result<Vec<Self>, GatePayApiError> {
        let chains = data.get("chains").ok_or_else(|| GatePayApiError::MalformedResponse("data.chains".into()))?;
        if chains.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(chains.clone()).map_err(|e| GatePayApiError::JsonError(e.to_string()))
    }
}

//--------------------------------------      InvoiceRequest     ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalEnv {
    pub terminal_type: String,
}

impl Default for TerminalEnv {
    fn default() -> Self {
        Self { terminal_type: "APP".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub goods_name: String,
}

/// The body of `POST /v1/pay/checkout/order`. Built fresh for every checkout attempt and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    /// The UTC time of the attempt in milliseconds, so that retries for the same order remain distinct.
    pub merchant_trade_no: String,
    pub currency: String,
    pub order_amount: Decimal,
    pub env: TerminalEnv,
    pub goods: Goods,
    pub chain: String,
    pub merchant_user_id: u64,
    pub full_curr_type: String,
    pub return_url: String,
    pub cancel_url: String,
}

//--------------------------------------         Invoice         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    /// GatePay accepted the checkout request.
    Created,
    Pending,
    Paid,
    /// Expired, cancelled, failed or any other state that will not become `Paid`.
    Terminal(String),
}

impl InvoiceStatus {
    /// Maps the `data.status` field of an order query.
    pub fn from_query_status(status: &str) -> Self {
        match status {
            "PAID" => Self::Paid,
            "PENDING" => Self::Pending,
            other => Self::Terminal(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "SUCCESS"),
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Terminal(s) => write!(f, "{s}"),
        }
    }
}

/// A GatePay invoice. Only `prepay_id` is kept once the checkout completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub prepay_id: String,
    pub status: InvoiceStatus,
    /// The hosted payment page. GatePay may omit it.
    pub location: Option<String>,
}

impl Invoice {
    pub(crate) fn from_created_data(data: &Value) -> Result<Self, GatePayApiError> {
        let prepay_id = match &data["prepayId"] {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(GatePayApiError::MalformedResponse("data.prepayId".into())),
        };
        let location = data["location"].as_str().filter(|s| !s.is_empty()).map(String::from);
        Ok(Self { prepay_id, status: InvoiceStatus::Created, location })
    }
}

pub(crate) fn query_status_from_data(data: &Value) -> Result<InvoiceStatus, GatePayApiError> {
    data["status"]
        .as_str()
        .map(InvoiceStatus::from_query_status)
        .ok_or_else(|| GatePayApiError::MalformedResponse("data.status".into()))
}
