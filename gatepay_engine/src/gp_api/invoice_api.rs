use std::fmt::Debug;

use gatepay_tools::{
    helpers::settlement_currency,
    Chain,
    Credentials,
    GatePayApi,
    GatePayApiError,
    GatePayResponse,
    Goods,
    Invoice,
    InvoiceRequest,
    TerminalEnv,
};
use gpg_common::utc_timestamp_millis;
use log::*;

use crate::{db_types::Order, gp_api::errors::InvoiceError, helpers::goods_name};

/// `InvoiceApi` turns a store order into a GatePay invoice.
#[derive(Clone)]
pub struct InvoiceApi {
    api: GatePayApi,
}

impl Debug for InvoiceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvoiceApi ({})", self.api.config().api_url)
    }
}

impl InvoiceApi {
    pub fn new(api: GatePayApi) -> Self {
        Self { api }
    }

    pub fn gatepay(&self) -> &GatePayApi {
        &self.api
    }

    /// Creates a fresh GatePay invoice for `order`.
    ///
    /// Nothing is sent unless `credentials` carry both a client id and a merchant user id. The settlement chain is
    /// looked up for the order currency first, then the checkout order is submitted. Neither call is cached, so every
    /// attempt produces a new invoice with its own `merchantTradeNo`.
    pub async fn create_invoice(&self, order: &Order, credentials: &Credentials) -> Result<Invoice, InvoiceError> {
        let merchant_user_id = match credentials.merchant_user_id {
            Some(id) if credentials.has_merchant_identity() => id,
            _ => {
                warn!("🧾️ Cannot create an invoice for order {}. The merchant is not configured.", order.id);
                return Err(InvoiceError::MissingMerchantConfiguration);
            },
        };
        let currency = settlement_currency(&order.currency);
        let chain = self.resolve_chain(&currency).await?;
        let site_url = self.api.config().site_url.clone();
        let request = InvoiceRequest {
            merchant_trade_no: utc_timestamp_millis().to_string(),
            currency,
            order_amount: order.total,
            env: TerminalEnv::default(),
            goods: Goods { goods_name: goods_name(order.product_titles().as_slice()) },
            chain: chain.chain,
            merchant_user_id,
            full_curr_type: chain.full_curr_type,
            return_url: site_url.clone(),
            cancel_url: site_url,
        };
        match self.api.create_order(&request).await {
            Ok(GatePayResponse::Success(invoice)) => {
                info!("🧾️ Invoice {} created for order {}", invoice.prepay_id, order.id);
                Ok(invoice)
            },
            Ok(GatePayResponse::Rejected { status, message }) => {
                warn!("🧾️ GatePay rejected the invoice for order {} [{status}]: {message}", order.id);
                Err(InvoiceError::RemoteRejection(message))
            },
            Err(e) => Err(unusable_response(order, e)),
        }
    }

    async fn resolve_chain(&self, currency: &str) -> Result<Chain, InvoiceError> {
        let unsupported = || InvoiceError::UnsupportedCurrency(currency.to_string());
        match self.api.fetch_chains(currency).await {
            Ok(GatePayResponse::Success(chains)) => {
                let chain = chains.into_iter().next().ok_or_else(unsupported)?;
                debug!("🧾️ {currency} settles on {} ({})", chain.chain, chain.full_curr_type);
                Ok(chain)
            },
            Ok(GatePayResponse::Rejected { message, .. }) => {
                warn!("🧾️ Chain lookup for {currency} was rejected: {message}");
                Err(unsupported())
            },
            Err(GatePayApiError::MissingPaymentKey) => {
                warn!("🧾️ Cannot look up the chain for {currency}. The payment key is not configured.");
                Err(InvoiceError::MissingPaymentKey)
            },
            Err(e) if e.is_transport_error() => {
                error!("🧾️ Chain lookup for {currency} failed. {e}");
                Err(InvoiceError::Unavailable(e.to_string()))
            },
            Err(e) => {
                warn!("🧾️ Chain lookup for {currency} returned no usable data. {e}");
                Err(unsupported())
            },
        }
    }
}

fn unusable_response(order: &Order, e: GatePayApiError) -> InvoiceError {
    match e {
        GatePayApiError::MissingPaymentKey => {
            warn!("🧾️ Cannot create an invoice for order {}. The payment key is not configured.", order.id);
            InvoiceError::MissingPaymentKey
        },
        e => {
            error!("🧾️ Invoice creation for order {} failed. {e}", order.id);
            InvoiceError::Unavailable(e.to_string())
        },
    }
}
