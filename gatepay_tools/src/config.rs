use std::{env, time::Duration};

use gpg_common::Secret;
use log::*;

pub const DEFAULT_GATEPAY_API_URL: &str = "https://openplatform.gateapi.io";
pub const DEFAULT_GATEWAY_ID: &str = "wc_gate";
pub const DEFAULT_SITE_URL: &str = "http://localhost/";
/// Successful responses fetched with a cache key are kept for 30 minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(1800);

/// The merchant credentials issued by GatePay. Loaded once, never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub payment_key: Secret<String>,
    pub merchant_user_id: Option<u64>,
}

impl Credentials {
    pub fn new(client_id: &str, payment_key: &str, merchant_user_id: Option<u64>) -> Self {
        Self { client_id: client_id.to_string(), payment_key: Secret::from(payment_key), merchant_user_id }
    }

    /// Invoices can only be created when both the client id and the merchant user id are known.
    pub fn has_merchant_identity(&self) -> bool {
        !self.client_id.trim().is_empty() && self.merchant_user_id.is_some_and(|id| id > 0)
    }
}

#[derive(Debug, Clone)]
pub struct GatePayConfig {
    /// Base URL of the GatePay open platform, without a trailing slash.
    pub api_url: String,
    pub credentials: Credentials,
    /// Public base URL of the store. Buyers return here after paying or cancelling.
    pub site_url: String,
    /// Identifies this gateway in the IPN callback URL.
    pub gateway_id: String,
    pub cache_ttl: Duration,
}

impl Default for GatePayConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GATEPAY_API_URL.to_string(),
            credentials: Credentials::default(),
            site_url: DEFAULT_SITE_URL.to_string(),
            gateway_id: DEFAULT_GATEWAY_ID.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl GatePayConfig {
    pub fn new(api_url: &str, credentials: Credentials) -> Self {
        Self { api_url: api_url.trim_end_matches('/').to_string(), credentials, ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let api_url = env::var("GPG_API_URL").unwrap_or_else(|_| {
            info!("🪛️ GPG_API_URL not set, using {DEFAULT_GATEPAY_API_URL}");
            DEFAULT_GATEPAY_API_URL.to_string()
        });
        let client_id = env::var("GPG_CLIENT_ID").unwrap_or_else(|_| {
            warn!("🪛️ GPG_CLIENT_ID not set. Checkouts will fail until it is configured.");
            String::default()
        });
        let payment_key = Secret::new(env::var("GPG_PAYMENT_KEY").unwrap_or_else(|_| {
            warn!("🪛️ GPG_PAYMENT_KEY not set. Requests to GatePay cannot be signed.");
            String::default()
        }));
        let merchant_user_id = match env::var("GPG_MERCHANT_USER_ID") {
            Ok(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| error!("🪛️ {s} is not a valid value for GPG_MERCHANT_USER_ID. {e}"))
                .ok(),
            Err(_) => {
                warn!("🪛️ GPG_MERCHANT_USER_ID not set. Checkouts will fail until it is configured.");
                None
            },
        };
        let site_url = env::var("GPG_SITE_URL").unwrap_or_else(|_| {
            warn!("🪛️ GPG_SITE_URL not set, using (probably useless) default {DEFAULT_SITE_URL}");
            DEFAULT_SITE_URL.to_string()
        });
        let gateway_id = env::var("GPG_GATEWAY_ID").unwrap_or_else(|_| DEFAULT_GATEWAY_ID.to_string());
        let cache_ttl = env::var("GPG_CACHE_TTL")
            .ok()
            .and_then(|s| {
                s.parse::<u64>().map_err(|e| warn!("🪛️ Invalid configuration value for GPG_CACHE_TTL. {e}")).ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL);
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials: Credentials { client_id, payment_key, merchant_user_id },
            site_url,
            gateway_id,
            cache_ttl,
        }
    }

    pub fn with_site_url(mut self, site_url: &str) -> Self {
        self.site_url = site_url.to_string();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// The webhook address GatePay can be configured to notify: `{site_url}/wc-api/{gateway_id}/`.
    pub fn ipn_callback_url(&self) -> String {
        format!("{}/wc-api/{}/", self.site_url.trim_end_matches('/'), self.gateway_id)
    }
}
