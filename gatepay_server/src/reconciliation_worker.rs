use std::time::Duration;

use gatepay_engine::{db_types::OrderId, OrderManagement, ReconciliationApi};
use log::*;
use tokio::task::JoinHandle;

/// Starts the reconciliation worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// The first pass runs immediately, then once every `interval`. Each tick also drops expired GatePay responses from
/// the shared response cache.
pub fn start_reconciliation_worker<B>(api: ReconciliationApi<B>, interval: Duration) -> JoinHandle<()>
where B: OrderManagement + 'static {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!("🕰️ Reconciliation worker started. Checking up to {} orders every {interval:?}", api.batch_size());
        loop {
            timer.tick().await;
            debug!("🕰️ Running reconciliation job");
            match api.reconcile_pending_orders().await {
                Ok(result) if result.checked() == 0 => {
                    trace!("🕰️ No invoices awaiting payment");
                },
                Ok(result) => {
                    info!("🕰️ {} pending invoices checked", result.checked());
                    debug!("🕰️ Completed: {}", order_list(&result.completed));
                    debug!("🕰️ Released: {}", order_list(&result.released));
                    debug!("🕰️ Deferred: {}", order_list(&result.deferred));
                },
                Err(e) => {
                    error!("🕰️ Error running reconciliation job: {e}");
                },
            }
            let purged = api.gatepay().cache().purge_expired();
            if purged > 0 {
                debug!("🕰️ {purged} expired responses dropped from the GatePay cache");
            }
        }
    })
}

fn order_list(orders: &[OrderId]) -> String {
    orders.iter().map(|o| o.to_string()).collect::<Vec<String>>().join(", ")
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use gatepay_engine::{
        db_types::OrderStatusType,
        test_utils::prepare_env::{prepare_test_env, seed_order, test_credentials, test_gatepay_api, TEST_SITE_URL},
        MemoryDatabase,
        OrderManagement,
        ReconciliationApi,
    };
    use gatepay_tools::{GatePayApi, GatePayConfig, ORDER_QUERY_PATH};
    use mockito::Server;
    use serde_json::json;

    use super::start_reconciliation_worker;

    #[tokio::test]
    async fn worker_completes_paid_orders() {
        prepare_test_env();
        let mut server = Server::new_async().await;
        let _paid = server
            .mock("POST", ORDER_QUERY_PATH)
            .with_status(200)
            .with_body(json!({"status": "SUCCESS", "data": {"status": "PAID"}}).to_string())
            .create_async()
            .await;
        let db = MemoryDatabase::new(TEST_SITE_URL);
        seed_order(&db, "7001", "3".parse().unwrap(), &["Sticker"], Some("9901")).await;
        let api = ReconciliationApi::new(db.clone(), test_gatepay_api(&server.url(), test_credentials()));

        let handle = start_reconciliation_worker(api, Duration::from_millis(50));
        let mut status = OrderStatusType::OnHold;
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            status = db.fetch_order(&"7001".into()).await.unwrap().unwrap().status;
            if status == OrderStatusType::Completed {
                break;
            }
        }
        handle.abort();
        assert_eq!(status, OrderStatusType::Completed);
    }

    #[tokio::test]
    async fn worker_purges_expired_responses() {
        prepare_test_env();
        let ttl = Duration::from_millis(20);
        let config = GatePayConfig::new("http://127.0.0.1:1", test_credentials()).with_cache_ttl(ttl);
        let client = GatePayApi::new(config).unwrap();
        let cache = client.cache().clone();
        cache.insert("cart-1", json!({"status": "SUCCESS"}));
        cache.insert("cart-2", json!({"status": "SUCCESS"}));
        let api = ReconciliationApi::new(MemoryDatabase::new(TEST_SITE_URL), client);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.len(), 2);
        let handle = start_reconciliation_worker(api, Duration::from_millis(50));
        for _ in 0..40 {
            tokio::time::sleep(Duration::from_millis(25)).await;
            if cache.is_empty() {
                break;
            }
        }
        handle.abort();
        assert!(cache.is_empty());
    }
}
