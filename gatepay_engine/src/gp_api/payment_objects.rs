use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::OrderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentResult {
    Success,
    Failure,
}

/// What the checkout page should do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub result: PaymentResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<String>,
}

impl PaymentOutcome {
    pub fn success(redirect: String) -> Self {
        Self { result: PaymentResult::Success, redirect: Some(redirect), messages: None }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self { result: PaymentResult::Failure, redirect: None, messages: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.result == PaymentResult::Success
    }
}

/// The order ids touched by one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Paid invoices; the order is now completed.
    pub completed: Vec<OrderId>,
    /// Invoices that ended without payment; the order no longer carries an invoice.
    pub released: Vec<OrderId>,
    /// Still pending, or no usable answer from GatePay. Looked at again on the next pass.
    pub deferred: Vec<OrderId>,
}

impl ReconciliationResult {
    pub fn checked(&self) -> usize {
        self.completed.len() + self.released.len() + self.deferred.len()
    }
}

impl Display for ReconciliationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "checked: {}, completed: {}, released: {}, deferred: {}",
            self.checked(),
            self.completed.len(),
            self.released.len(),
            self.deferred.len()
        )
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn outcome_wire_shape() {
        let ok = PaymentOutcome::success("https://pay.example/1".into());
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"result": "success", "redirect": "https://pay.example/1"}));
        let failed = PaymentOutcome::failure("limit exceeded");
        assert_eq!(serde_json::to_value(&failed).unwrap(), json!({"result": "failure", "messages": "limit exceeded"}));
        assert!(!failed.is_success());
    }

    #[test]
    fn summary() {
        let result = ReconciliationResult {
            completed: vec!["1".into()],
            released: vec![],
            deferred: vec!["2".into(), "3".into()],
        };
        assert_eq!(result.to_string(), "checked: 3, completed: 1, released: 0, deferred: 2");
    }
}
