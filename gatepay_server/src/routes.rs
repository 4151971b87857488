//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every call into the store or out to GatePay is therefore expressed
//! as a future and awaited, never blocked on.
use actix_web::{get, web, HttpResponse, Responder};
use gatepay_engine::{
    db_types::{NewOrder, OrderId},
    CartManagement,
    OrderManagement,
    PaymentFlowApi,
    ReconciliationApi,
};
use log::*;

use crate::{data_objects::GatewayDescriptor, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Gateway  ---------------------------------------------------
/// How the store should present GatePay at checkout, including the IPN callback URL.
#[get("/gateway")]
pub async fn gateway(descriptor: web::Data<GatewayDescriptor>) -> impl Responder {
    trace!("💻️ Received gateway descriptor request");
    HttpResponse::Ok().json(descriptor.get_ref())
}

// ----------------------------------------------   Orders  ----------------------------------------------------
route!(upsert_order => Post "/orders" impl OrderManagement);
/// The host store pushes order snapshots here. Any invoice already attached to the order is preserved.
pub async fn upsert_order<B: OrderManagement>(
    body: web::Json<NewOrder>,
    db: web::Data<B>,
) -> Result<HttpResponse, ServerError> {
    let order = body.into_inner();
    debug!("💻️ POST upsert_order({})", order.id);
    let order = db.upsert_order(order).await.map_err(|e| {
        warn!("💻️ Could not save order. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderManagement);
pub async fn order_by_id<B: OrderManagement>(
    path: web::Path<OrderId>,
    db: web::Data<B>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order_by_id({order_id})");
    let order = db.fetch_order(&order_id).await.map_err(|e| {
        debug!("💻️ Could not fetch order. {e}");
        ServerError::BackendError(e.to_string())
    })?;
    match order {
        Some(order) => Ok(HttpResponse::Ok().json(order)),
        None => Err(ServerError::NoRecordFound(format!("Order {order_id} does not exist"))),
    }
}

// ----------------------------------------------   Checkout  --------------------------------------------------
route!(checkout => Post "/checkout/{order_id}" impl OrderManagement, CartManagement);
/// Starts a GatePay payment for the order.
///
/// A payment that could not be initiated is still a `200 OK`: the body carries `"result": "failure"` and the message
/// to show the buyer. Only an unknown order or a store failure produce an error status.
pub async fn checkout<B: OrderManagement + CartManagement>(
    path: web::Path<OrderId>,
    api: web::Data<PaymentFlowApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ POST checkout({order_id})");
    let outcome = api.process_payment(&order_id).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

// ----------------------------------------------   Reconcile  -------------------------------------------------
route!(reconcile => Post "/reconcile" impl OrderManagement);
/// Runs one reconciliation pass immediately, without waiting for the background worker.
pub async fn reconcile<B: OrderManagement>(
    api: web::Data<ReconciliationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST reconcile");
    let result = api.reconcile_pending_orders().await?;
    info!("💻️ On-demand reconciliation finished. {result}");
    Ok(HttpResponse::Ok().json(result))
}
