use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use gatepay_engine::{
    test_utils::prepare_env::{test_credentials, test_gatepay_api},
    InvoiceApi,
    MemoryDatabase,
    PaymentFlowApi,
    ReconciliationApi,
};
use log::debug;

use crate::{
    data_objects::GatewayDescriptor,
    routes::{gateway, health, CheckoutRoute, OrderByIdRoute, ReconcileRoute, UpsertOrderRoute},
};

/// Sends `req` to an app backed by `db`, with GatePay served from `gatepay_url`.
pub async fn send_request(req: TestRequest, db: &MemoryDatabase, gatepay_url: &str) -> (StatusCode, String) {
    let api = test_gatepay_api(gatepay_url, test_credentials());
    let app = App::new()
        .app_data(web::Data::new(db.clone()))
        .app_data(web::Data::new(PaymentFlowApi::new(db.clone(), InvoiceApi::new(api.clone()))))
        .app_data(web::Data::new(GatewayDescriptor::from_config(api.config())))
        .app_data(web::Data::new(ReconciliationApi::new(db.clone(), api)))
        .service(health)
        .service(gateway)
        .service(UpsertOrderRoute::<MemoryDatabase>::new())
        .service(OrderByIdRoute::<MemoryDatabase>::new())
        .service(CheckoutRoute::<MemoryDatabase>::new())
        .service(ReconcileRoute::<MemoryDatabase>::new());
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

/// For routes that never reach GatePay.
pub const NO_GATEPAY: &str = "http://127.0.0.1:1";
