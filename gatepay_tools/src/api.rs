use std::{sync::Arc, time::Duration};

use gpg_common::utc_timestamp_millis;
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
    Method,
};
use serde_json::{json, Value};

use crate::{
    cache::ResponseCache,
    config::{Credentials, GatePayConfig},
    data_objects::{query_status_from_data, Chain, GatePayResponse, Invoice, InvoiceRequest, InvoiceStatus},
    signer::{new_nonce, RequestSigner},
    GatePayApiError,
};

pub const CHAINS_PATH: &str = "/v1/pay/address/chains";
pub const CHECKOUT_ORDER_PATH: &str = "/v1/pay/checkout/order";
pub const ORDER_QUERY_PATH: &str = "/v1/pay/order/query";

pub const HEADER_CLIENT_ID: &str = "X-GatePay-Certificate-ClientId";
pub const HEADER_TIMESTAMP: &str = "X-GatePay-Timestamp";
pub const HEADER_NONCE: &str = "X-GatePay-Nonce";
pub const HEADER_SIGNATURE: &str = "X-GatePay-Signature";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the GatePay open platform.
///
/// Clones are cheap and share the HTTP connection pool and the response cache.
#[derive(Clone)]
pub struct GatePayApi {
    config: GatePayConfig,
    client: Arc<Client>,
    signer: Option<RequestSigner>,
    cache: ResponseCache,
}

impl GatePayApi {
    pub fn new(config: GatePayConfig) -> Result<Self, GatePayApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client_id = HeaderValue::from_str(config.credentials.client_id.as_str())
            .map_err(|e| GatePayApiError::Initialization(e.to_string()))?;
        headers.insert(HEADER_CLIENT_ID, client_id);
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatePayApiError::Initialization(e.to_string()))?;
        let signer = match RequestSigner::new(&config.credentials.payment_key) {
            Ok(signer) => Some(signer),
            Err(GatePayApiError::MissingPaymentKey) => {
                warn!("🔐️ No GatePay payment key is configured. All GatePay requests will be refused locally.");
                None
            },
            Err(e) => return Err(e),
        };
        let cache = ResponseCache::new(config.cache_ttl);
        Ok(Self { config, client: Arc::new(client), signer, cache })
    }

    pub fn config(&self) -> &GatePayConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Credentials {
        &self.config.credentials
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Sends a signed request to GatePay and returns the parsed JSON body, whatever its `status`.
    ///
    /// When `cache_key` is given, an unexpired cached response is returned without touching the network, and a
    /// fresh response whose `status` is `SUCCESS` replaces whatever was cached under that key.
    ///
    /// Nothing is retried. Transport failures and bodies that are not JSON are returned as errors, which callers
    /// treat as "no usable data".
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
        cache_key: Option<&str>,
    ) -> Result<Value, GatePayApiError> {
        if let Some(key) = cache_key {
            if let Some(cached) = self.cache.get(key) {
                trace!("🗃️ Cache hit for {key}");
                return Ok(cached);
            }
        }
        let signer = self.signer.as_ref().ok_or(GatePayApiError::MissingPaymentKey)?;
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| GatePayApiError::RestRequestError(e.to_string()))?
            .unwrap_or_default();
        let nonce = new_nonce();
        let timestamp = utc_timestamp_millis();
        let signature = signer.sign(&nonce, timestamp, &body);
        let url = self.url(path);
        trace!("📡️ Sending {method} {url}");
        let mut req = self
            .client
            .request(method, url)
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(HEADER_NONCE, nonce)
            .header(HEADER_SIGNATURE, signature);
        if !params.is_empty() {
            req = req.query(params);
        }
        if !body.is_empty() {
            req = req.body(body);
        }
        let response = req.send().await.map_err(|e| GatePayApiError::RestRequestError(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| GatePayApiError::RestResponseError(e.to_string()))?;
        trace!("📡️ GatePay responded with {status}: {text}");
        let value = serde_json::from_str::<Value>(&text)
            .map_err(|e| GatePayApiError::JsonError(format!("HTTP {status}. {e}")))?;
        if let Some(key) = cache_key {
            if value["status"].as_str() == Some("SUCCESS") {
                trace!("🗃️ Caching response under {key}");
                self.cache.insert(key, value.clone());
            }
        }
        Ok(value)
    }

    /// Lists the settlement chains GatePay offers for `currency`. Never cached.
    pub async fn fetch_chains(&self, currency: &str) -> Result<GatePayResponse<Vec<Chain>>, GatePayApiError> {
        debug!("📡️ Fetching chains for {currency}");
        let value = self.call(Method::GET, CHAINS_PATH, &[("currency", currency)], None, None).await?;
        GatePayResponse::from_value(&value, Chain::list_from_data)
    }

    /// Submits a checkout order. Never cached: every submission creates a new invoice.
    pub async fn create_order(&self, request: &InvoiceRequest) -> Result<GatePayResponse<Invoice>, GatePayApiError> {
        let body = serde_json::to_value(request).map_err(|e| GatePayApiError::RestRequestError(e.to_string()))?;
        debug!("📡️ Creating GatePay order {} for {} {}", request.merchant_trade_no, request.order_amount, request.currency);
        let value = self.call(Method::POST, CHECKOUT_ORDER_PATH, &[], Some(&body), None).await?;
        let result = GatePayResponse::from_value(&value, Invoice::from_created_data)?;
        if let GatePayResponse::Success(invoice) = &result {
            info!("📡️ GatePay invoice {} created for order {}", invoice.prepay_id, request.merchant_trade_no);
        }
        Ok(result)
    }

    /// Fetches the current state of an invoice. Never cached.
    pub async fn query_order(&self, prepay_id: &str) -> Result<GatePayResponse<InvoiceStatus>, GatePayApiError> {
        trace!("📡️ Querying GatePay invoice {prepay_id}");
        let body = json!({ "prepayId": prepay_id });
        let value = self.call(Method::POST, ORDER_QUERY_PATH, &[], Some(&body), None).await?;
        GatePayResponse::from_value(&value, query_status_from_data)
    }
}
