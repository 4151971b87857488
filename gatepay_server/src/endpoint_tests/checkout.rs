use actix_web::{http::StatusCode, test::TestRequest};
use gatepay_engine::{
    db_types::{OrderId, OrderStatusType},
    test_utils::prepare_env::{prepare_test_env, seed_order, TEST_SITE_URL},
    MemoryDatabase,
    OrderManagement,
};
use gatepay_tools::{CHAINS_PATH, CHECKOUT_ORDER_PATH};
use mockito::{Matcher, Server};
use serde_json::{json, Value};

use super::helpers::send_request;

#[actix_web::test]
async fn checkout_redirects_to_gatepay() {
    prepare_test_env();
    let mut server = Server::new_async().await;
    let chains = server
        .mock("GET", CHAINS_PATH)
        .match_query(Matcher::UrlEncoded("currency".into(), "USDT".into()))
        .with_status(200)
        .with_body(json!({"status": "SUCCESS", "data": {"chains": [{"chain": "TRX", "fullCurrType": "TRX_USDT"}]}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", CHECKOUT_ORDER_PATH)
        .match_body(Matcher::PartialJson(json!({"orderAmount": "42.50", "goods": {"goodsName": "Mug"}})))
        .with_status(200)
        .with_body(json!({"status": "SUCCESS", "data": {"prepayId": "8001", "location": "https://pay.example/8001"}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let db = MemoryDatabase::new(TEST_SITE_URL);
    seed_order(&db, "5001", "42.50".parse().unwrap(), &["Mug"], None).await;

    let (status, body) = send_request(TestRequest::post().uri("/checkout/5001"), &db, &server.url()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let outcome: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(outcome, json!({"result": "success", "redirect": "https://pay.example/8001"}));

    let order = db.fetch_order(&"5001".into()).await.unwrap().unwrap();
    assert_eq!(order.invoice(), Some("8001"));
    assert_eq!(order.status, OrderStatusType::OnHold);
    assert_eq!(db.cleared_carts().await, vec![OrderId::from("5001")]);
    chains.assert_async().await;
    create.assert_async().await;
}

#[actix_web::test]
async fn failed_checkout_is_still_ok() {
    prepare_test_env();
    let mut server = Server::new_async().await;
    let _chains = server
        .mock("GET", CHAINS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({"status": "SUCCESS", "data": {"chains": [{"chain": "TRX", "fullCurrType": "TRX_USDT"}]}}).to_string())
        .create_async()
        .await;
    let _create = server
        .mock("POST", CHECKOUT_ORDER_PATH)
        .with_status(200)
        .with_body(json!({"status": "FAIL", "code": "400007", "errorMessage": "limit exceeded"}).to_string())
        .create_async()
        .await;
    let db = MemoryDatabase::new(TEST_SITE_URL);
    seed_order(&db, "5002", "10".parse().unwrap(), &["Mug"], None).await;

    let (status, body) = send_request(TestRequest::post().uri("/checkout/5002"), &db, &server.url()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let outcome: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(outcome, json!({"result": "failure", "messages": "limit exceeded"}));

    let order = db.fetch_order(&"5002".into()).await.unwrap().unwrap();
    assert!(!order.has_invoice());
    assert_eq!(order.status, OrderStatusType::Pending);
    assert!(db.cleared_carts().await.is_empty());
}

#[actix_web::test]
async fn checkout_of_unknown_order() {
    prepare_test_env();
    let mut server = Server::new_async().await;
    let untouched = server.mock("GET", CHAINS_PATH).match_query(Matcher::Any).expect(0).create_async().await;
    let db = MemoryDatabase::new(TEST_SITE_URL);

    let (status, body) = send_request(TestRequest::post().uri("/checkout/404"), &db, &server.url()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert!(error["error"].as_str().unwrap().contains("#404"), "{body}");
    untouched.assert_async().await;
}
