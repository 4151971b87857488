use std::{env, time::Duration};

use gatepay_engine::DEFAULT_BATCH_SIZE;
use gatepay_tools::GatePayConfig;
use gpg_common::parse_boolean_flag;
use log::*;

const DEFAULT_GPG_HOST: &str = "127.0.0.1";
const DEFAULT_GPG_PORT: u16 = 8370;
/// Pending invoices are checked every five minutes.
const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// GatePay credentials, endpoints and store URLs.
    pub gatepay: GatePayConfig,
    pub reconciliation: ReconciliationConfig,
}

#[derive(Clone, Copy, Debug)]
pub struct ReconciliationConfig {
    /// If false, pending orders are only reconciled on demand through `POST /reconcile`.
    pub enabled: bool,
    pub interval: Duration,
    pub batch_size: usize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self { enabled: true, interval: DEFAULT_RECONCILE_INTERVAL, batch_size: DEFAULT_BATCH_SIZE }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GPG_HOST.to_string(),
            port: DEFAULT_GPG_PORT,
            gatepay: GatePayConfig::default(),
            reconciliation: ReconciliationConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GPG_HOST").ok().unwrap_or_else(|| DEFAULT_GPG_HOST.into());
        let port = env::var("GPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GPG_PORT. {e} Using the default, {DEFAULT_GPG_PORT}, instead."
                    );
                    DEFAULT_GPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GPG_PORT);
        let gatepay = GatePayConfig::new_from_env_or_default();
        let reconciliation = ReconciliationConfig::from_env_or_default();
        Self { host, port, gatepay, reconciliation }
    }
}

impl ReconciliationConfig {
    pub fn from_env_or_default() -> Self {
        let enabled = parse_boolean_flag(env::var("GPG_RECONCILE_ENABLED").ok(), true);
        if !enabled {
            warn!("🪛️ The reconciliation worker is disabled. Orders will only be reconciled via POST /reconcile.");
        }
        let interval = env::var("GPG_RECONCILE_INTERVAL")
            .map_err(|_| {
                info!(
                    "🪛️ GPG_RECONCILE_INTERVAL is not set. Using the default value of {} s.",
                    DEFAULT_RECONCILE_INTERVAL.as_secs()
                )
            })
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for GPG_RECONCILE_INTERVAL. {e}"))
                    .and_then(|secs| {
                        if secs == 0 {
                            warn!("🪛️ GPG_RECONCILE_INTERVAL must be greater than zero.");
                            Err(())
                        } else {
                            Ok(Duration::from_secs(secs))
                        }
                    })
            })
            .unwrap_or(DEFAULT_RECONCILE_INTERVAL);
        let batch_size = env::var("GPG_RECONCILE_BATCH_SIZE")
            .ok()
            .and_then(|s| {
                s.parse::<usize>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for GPG_RECONCILE_BATCH_SIZE. {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_BATCH_SIZE);
        Self { enabled, interval, batch_size }
    }
}
