//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the wallet
//! session service. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::blockchain::network::{NetworkDescriptor, KAIROS_RPC_URL};

/// Root configuration for the wallet session service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// HTTP API listener.
    pub listener: ListenerConfig,

    /// Network the session must be on.
    pub network: NetworkDescriptor,

    /// Fiat price feed.
    pub price: PriceConfig,

    /// Which signer capability to use.
    pub signer: SignerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8090").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8090".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Fiat price feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Query the feed at all. When disabled the default rate is used.
    pub enabled: bool,

    /// Endpoint of a `simple/price` style API.
    pub url: String,

    /// Asset identifier on the feed.
    pub asset_id: String,

    /// Fiat currency to quote in.
    pub vs_currency: String,

    /// Rate used whenever the feed is unavailable.
    pub default_rate: f64,

    /// Overall budget for obtaining a rate, retries included.
    pub timeout_ms: u64,

    /// Budget for a single request; at most `timeout_ms`.
    pub attempt_timeout_ms: u64,

    /// Attempts per fetch (1 = no retries).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

/// Fallback KAIA/USD rate.
pub const DEFAULT_FIAT_RATE: f64 = 0.15;

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            asset_id: "kaia".to_string(),
            vs_currency: "usd".to_string(),
            default_rate: DEFAULT_FIAT_RATE,
            timeout_ms: 3000,
            attempt_timeout_ms: 1200,
            max_attempts: 2,
            base_delay_ms: 200,
            max_delay_ms: 1000,
        }
    }
}

/// Signer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignerMode {
    /// EIP-1193 wallet reachable over JSON-RPC.
    Bridge,
    /// Local key from the environment.
    Local,
    /// No signer; every connect reports the capability as unavailable.
    None,
}

/// Signer capability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    pub mode: SignerMode,

    /// JSON-RPC endpoint of the wallet bridge.
    pub bridge_url: String,

    /// Timeout for each signer request in seconds.
    pub rpc_timeout_secs: u64,

    /// Endpoints the local signer starts on.
    pub local_rpc_urls: Vec<String>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            mode: SignerMode::Bridge,
            // Frame and similar desktop wallets listen here.
            bridge_url: "http://127.0.0.1:1248".to_string(),
            rpc_timeout_secs: 120,
            local_rpc_urls: vec![KAIROS_RPC_URL.to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
