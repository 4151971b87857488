use actix_web::{http::StatusCode, test::TestRequest};
use gatepay_engine::{
    db_types::OrderStatusType,
    test_utils::prepare_env::{prepare_test_env, seed_order, TEST_SITE_URL},
    MemoryDatabase,
    OrderManagement,
};
use gatepay_tools::ORDER_QUERY_PATH;
use mockito::{Matcher, Server};
use serde_json::{json, Value};

use super::helpers::{send_request, NO_GATEPAY};

#[actix_web::test]
async fn reconcile_on_demand() {
    prepare_test_env();
    let mut server = Server::new_async().await;
    let paid = server
        .mock("POST", ORDER_QUERY_PATH)
        .match_body(Matcher::Json(json!({"prepayId": "9001"})))
        .with_status(200)
        .with_body(json!({"status": "SUCCESS", "data": {"prepayId": "9001", "status": "PAID"}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let expired = server
        .mock("POST", ORDER_QUERY_PATH)
        .match_body(Matcher::Json(json!({"prepayId": "9002"})))
        .with_status(200)
        .with_body(json!({"status": "SUCCESS", "data": {"prepayId": "9002", "status": "EXPIRED"}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let db = MemoryDatabase::new(TEST_SITE_URL);
    seed_order(&db, "6001", "12".parse().unwrap(), &["Mug"], Some("9001")).await;
    seed_order(&db, "6002", "12".parse().unwrap(), &["Mug"], Some("9002")).await;

    let (status, body) = send_request(TestRequest::post().uri("/reconcile"), &db, &server.url()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result, json!({"completed": ["6001"], "released": ["6002"], "deferred": []}));

    let completed = db.fetch_order(&"6001".into()).await.unwrap().unwrap();
    assert_eq!(completed.status, OrderStatusType::Completed);
    let released = db.fetch_order(&"6002".into()).await.unwrap().unwrap();
    assert_eq!(released.status, OrderStatusType::OnHold);
    assert!(!released.has_invoice());
    paid.assert_async().await;
    expired.assert_async().await;
}

#[actix_web::test]
async fn reconcile_with_gatepay_down() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    seed_order(&db, "6003", "12".parse().unwrap(), &["Mug"], Some("9003")).await;

    let (status, body) = send_request(TestRequest::post().uri("/reconcile"), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["deferred"], json!(["6003"]));
    let order = db.fetch_order(&"6003".into()).await.unwrap().unwrap();
    assert_eq!(order.invoice(), Some("9003"));
}
