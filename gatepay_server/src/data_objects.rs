use gatepay_tools::GatePayConfig;
use serde::{Deserialize, Serialize};

pub const GATEWAY_TITLE: &str = "Pay with GatePay";
pub const GATEWAY_DESCRIPTION: &str = "Pay using GatePay payment gateway.";

/// How the host store should list this payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Where GatePay can send payment notifications for this store.
    pub ipn_url: String,
}

impl GatewayDescriptor {
    pub fn from_config(config: &GatePayConfig) -> Self {
        Self {
            id: config.gateway_id.clone(),
            title: GATEWAY_TITLE.to_string(),
            description: GATEWAY_DESCRIPTION.to_string(),
            ipn_url: config.ipn_callback_url(),
        }
    }
}
