use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use gatepay_engine::{InvoiceApi, MemoryDatabase, PaymentFlowApi, ReconciliationApi};
use gatepay_tools::GatePayApi;
use log::*;

use crate::{
    config::ServerConfig,
    data_objects::GatewayDescriptor,
    errors::ServerError,
    reconciliation_worker::start_reconciliation_worker,
    routes::{gateway, health, CheckoutRoute, OrderByIdRoute, ReconcileRoute, UpsertOrderRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = MemoryDatabase::new(&config.gatepay.site_url);
    let api = GatePayApi::new(config.gatepay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ GatePay IPN callback URL: {}", config.gatepay.ipn_callback_url());
    if config.reconciliation.enabled {
        let reconciler =
            ReconciliationApi::new(db.clone(), api.clone()).with_batch_size(config.reconciliation.batch_size);
        let _handle = start_reconciliation_worker(reconciler, config.reconciliation.interval);
    }
    let srv = create_server_instance(config, db, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: MemoryDatabase,
    api: GatePayApi,
) -> Result<Server, ServerError> {
    let payments = web::Data::new(PaymentFlowApi::new(db.clone(), InvoiceApi::new(api.clone())));
    let reconciler =
        web::Data::new(ReconciliationApi::new(db.clone(), api).with_batch_size(config.reconciliation.batch_size));
    let descriptor = web::Data::new(GatewayDescriptor::from_config(&config.gatepay));
    let store = web::Data::new(db);
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("gpg::access_log"))
            .app_data(store.clone())
            .app_data(payments.clone())
            .app_data(reconciler.clone())
            .app_data(descriptor.clone())
            .service(health)
            .service(gateway)
            .service(UpsertOrderRoute::<MemoryDatabase>::new())
            .service(OrderByIdRoute::<MemoryDatabase>::new())
            .service(CheckoutRoute::<MemoryDatabase>::new())
            .service(ReconcileRoute::<MemoryDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
