use std::time::Duration;

use gatepay_tools::{Credentials, GatePayApi, GatePayConfig};
use log::*;
use rust_decimal::Decimal;

use crate::{
    db::traits::OrderManagement,
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    MemoryDatabase,
};

pub const TEST_SITE_URL: &str = "https://shop.example/";
pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_PAYMENT_KEY: &str = "test-payment-key";
pub const TEST_MERCHANT_USER_ID: u64 = 3915898;

pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_CLIENT_ID, TEST_PAYMENT_KEY, Some(TEST_MERCHANT_USER_ID))
}

/// A client pointed at `url`, typically a mock server.
pub fn test_gatepay_api(url: &str, credentials: Credentials) -> GatePayApi {
    let config = GatePayConfig::new(url, credentials).with_site_url(TEST_SITE_URL).with_cache_ttl(Duration::from_secs(60));
    GatePayApi::new(config).expect("Error creating GatePay client")
}

/// Adds an order to `db` and, if `invoice` is given, puts it on hold with that invoice.
pub async fn seed_order(
    db: &MemoryDatabase,
    id: &str,
    total: Decimal,
    titles: &[&str],
    invoice: Option<&str>,
) -> Order {
    let mut order = NewOrder::new(id, "USD", total);
    for title in titles {
        order = order.with_item(title);
    }
    let order = db.upsert_order(order).await.expect("Error saving order");
    match invoice {
        Some(prepay_id) => {
            let id = OrderId::from(id);
            db.set_invoice(&id, prepay_id).await.expect("Error setting invoice");
            db.update_status(&id, OrderStatusType::OnHold, "").await.expect("Error updating status")
        },
        None => order,
    }
}
