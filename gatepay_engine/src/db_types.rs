use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The order metadata key that holds the current GatePay `prepayId`.
pub const INVOICE_META_KEY: &str = "_gate_invoice";

//--------------------------------------        OrderId          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
/// Order states as the host store knows them. The engine only ever moves orders to `OnHold` (awaiting payment) and
/// `Completed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatusType {
    /// Created, nothing has been paid yet.
    #[default]
    Pending,
    Processing,
    /// Awaiting payment of a GatePay invoice.
    OnHold,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatusType::Pending => "pending",
            OrderStatusType::Processing => "processing",
            OrderStatusType::OnHold => "on-hold",
            OrderStatusType::Completed => "completed",
            OrderStatusType::Cancelled => "cancelled",
            OrderStatusType::Refunded => "refunded",
            OrderStatusType::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(String);

impl FromStr for OrderStatusType {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "on-hold" | "onhold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            "failed" => Ok(Self::Failed),
            _ => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        LineItem         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_title: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new<S: Into<String>>(product_title: S) -> Self {
        Self { product_title: product_title.into(), quantity: 1 }
    }
}

//--------------------------------------         Order           ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// ISO currency code of the store, e.g. `USD`.
    pub currency: String,
    pub total: Decimal,
    pub items: Vec<LineItem>,
    pub status: OrderStatusType,
    /// The `prepayId` of the current GatePay invoice, if any.
    #[serde(rename = "_gate_invoice", default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// The stored `prepayId`, with an empty value treated as absent.
    pub fn invoice(&self) -> Option<&str> {
        self.invoice.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn has_invoice(&self) -> bool {
        self.invoice().is_some()
    }

    pub fn product_titles(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.product_title.as_str()).collect()
    }
}

//--------------------------------------        NewOrder         ---------------------------------------------------------
/// An order snapshot pushed by the host store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub id: OrderId,
    pub currency: String,
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// When absent, an existing order keeps its status and a new one starts as `pending`.
    #[serde(default)]
    pub status: Option<OrderStatusType>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(id: S, currency: &str, total: Decimal) -> Self {
        Self { id: OrderId::new(id), currency: currency.to_string(), total, items: Vec::new(), status: None }
    }

    pub fn with_item(mut self, product_title: &str) -> Self {
        self.items.push(LineItem::new(product_title));
        self
    }

    pub fn with_status(mut self, status: OrderStatusType) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    #[test]
    fn status_round_trip() {
        for status in [
            OrderStatusType::Pending,
            OrderStatusType::Processing,
            OrderStatusType::OnHold,
            OrderStatusType::Completed,
            OrderStatusType::Cancelled,
            OrderStatusType::Refunded,
            OrderStatusType::Failed,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatusType>().unwrap(), status);
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, json!(status.to_string()));
        }
        assert!("shipped".parse::<OrderStatusType>().is_err());
        assert_eq!("On-Hold".parse::<OrderStatusType>().unwrap(), OrderStatusType::OnHold);
    }

    #[test]
    fn blank_invoice_is_no_invoice() {
        let now = Utc::now();
        let mut order = Order {
            id: OrderId::from("42"),
            currency: "USD".into(),
            total: dec!(19.99),
            items: vec![LineItem::new("Beanie")],
            status: OrderStatusType::OnHold,
            invoice: Some("  ".into()),
            notes: vec![],
            created_at: now,
            updated_at: now,
        };
        assert!(!order.has_invoice());
        order.invoice = Some("7001".into());
        assert_eq!(order.invoice(), Some("7001"));
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value[INVOICE_META_KEY], json!("7001"));
        assert_eq!(value["total"], json!("19.99"));
    }

    #[test]
    fn new_order_from_json() {
        let order: NewOrder = serde_json::from_value(json!({
            "id": "1042",
            "currency": "USD",
            "total": "19.99",
            "items": [{"product_title": "Beanie"}, {"product_title": "Scarf", "quantity": 2}]
        }))
        .unwrap();
        let expected = NewOrder::new("1042", "USD", dec!(19.99)).with_item("Beanie");
        assert_eq!(order.items[0], expected.items[0]);
        assert_eq!(order.items[1].quantity, 2);
        assert!(order.status.is_none());
        assert_eq!(order.id.to_string(), "#1042");
    }
}
