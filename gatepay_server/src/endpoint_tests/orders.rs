use actix_web::{http::StatusCode, test::TestRequest};
use gatepay_engine::{
    test_utils::prepare_env::{prepare_test_env, seed_order, TEST_SITE_URL},
    MemoryDatabase,
};
use serde_json::{json, Value};

use super::helpers::{send_request, NO_GATEPAY};

#[actix_web::test]
async fn health_check() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    let (status, body) = send_request(TestRequest::get().uri("/health"), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn gateway_descriptor() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    let (status, body) = send_request(TestRequest::get().uri("/gateway"), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK);
    let descriptor: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        descriptor,
        json!({
            "id": "wc_gate",
            "title": "Pay with GatePay",
            "description": "Pay using GatePay payment gateway.",
            "ipn_url": "https://shop.example/wc-api/wc_gate/"
        })
    );
}

#[actix_web::test]
async fn push_and_fetch_order() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    let order = json!({
        "id": "1001",
        "currency": "USD",
        "total": "19.99",
        "items": [{"product_title": "Beanie"}, {"product_title": "Scarf", "quantity": 2}]
    });
    let (status, body) = send_request(TestRequest::post().uri("/orders").set_json(&order), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let saved: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(saved["status"], "pending");
    assert_eq!(saved["total"], "19.99");
    assert_eq!(db.order_count().await, 1);

    let (status, body) = send_request(TestRequest::get().uri("/orders/1001"), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK);
    let fetched: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(fetched["id"], "1001");
    assert_eq!(fetched["items"][1]["quantity"], 2);
    assert!(fetched.get("_gate_invoice").is_none());
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    let (status, body) = send_request(TestRequest::get().uri("/orders/9999"), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Order #9999 does not exist"}"#);
}

#[actix_web::test]
async fn order_update_keeps_the_invoice() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    seed_order(&db, "1002", "5.00".parse().unwrap(), &["Pin"], Some("7002")).await;
    let update = json!({"id": "1002", "currency": "USD", "total": "6.00", "items": [{"product_title": "Pin"}]});
    let (status, body) = send_request(TestRequest::post().uri("/orders").set_json(&update), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let saved: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(saved["_gate_invoice"], "7002");
    assert_eq!(saved["status"], "on-hold");
    assert_eq!(saved["total"], "6.00");
}

#[actix_web::test]
async fn malformed_order_is_rejected() {
    prepare_test_env();
    let db = MemoryDatabase::new(TEST_SITE_URL);
    let (status, _) =
        send_request(TestRequest::post().uri("/orders").set_json(json!({"id": "1003"})), &db, NO_GATEPAY).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(db.order_count().await, 0);
}
