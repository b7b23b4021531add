//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, rates positive, decimals sane)
//! - Check URLs and socket addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WalletConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{SignerMode, WalletConfig};

/// Largest precision the unit conversion supports with headroom.
const MAX_DECIMALS: u8 = 36;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("invalid socket address '{}'", value)));
    }
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be greater than 0"));
    }

    let network = &config.network;
    if network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if network.chain_name.trim().is_empty() {
        errors.push(ValidationError::new("network.chain_name", "must not be empty"));
    }
    if network.native_currency.symbol.trim().is_empty() {
        errors.push(ValidationError::new("network.native_currency.symbol", "must not be empty"));
    }
    if network.native_currency.decimals > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "network.native_currency.decimals",
            format!("must be at most {}", MAX_DECIMALS),
        ));
    }
    if network.rpc_urls.is_empty() {
        errors.push(ValidationError::new("network.rpc_urls", "at least one RPC URL is required"));
    }
    for url in &network.rpc_urls {
        check_url(&mut errors, "network.rpc_urls", url);
    }
    for url in &network.block_explorer_urls {
        check_url(&mut errors, "network.block_explorer_urls", url);
    }

    let price = &config.price;
    if !price.default_rate.is_finite() || price.default_rate <= 0.0 {
        errors.push(ValidationError::new("price.default_rate", "must be a positive number"));
    }
    if price.enabled {
        check_url(&mut errors, "price.url", &price.url);
        if price.asset_id.is_empty() || price.vs_currency.is_empty() {
            errors.push(ValidationError::new("price", "asset_id and vs_currency are required"));
        }
        if price.timeout_ms == 0 {
            errors.push(ValidationError::new("price.timeout_ms", "must be greater than 0"));
        }
        if price.attempt_timeout_ms == 0 || price.attempt_timeout_ms > price.timeout_ms {
            errors.push(ValidationError::new(
                "price.attempt_timeout_ms",
                "must be greater than 0 and at most price.timeout_ms",
            ));
        }
        if price.max_attempts == 0 {
            errors.push(ValidationError::new("price.max_attempts", "must be at least 1"));
        }
    }

    let signer = &config.signer;
    if signer.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("signer.rpc_timeout_secs", "must be greater than 0"));
    }
    match signer.mode {
        SignerMode::Bridge => check_url(&mut errors, "signer.bridge_url", &signer.bridge_url),
        SignerMode::Local => {
            if signer.local_rpc_urls.is_empty() {
                errors.push(ValidationError::new("signer.local_rpc_urls", "required in local mode"));
            }
            for url in &signer.local_rpc_urls {
                check_url(&mut errors, "signer.local_rpc_urls", url);
            }
        }
        SignerMode::None => {}
    }

    if config.observability.metrics_enabled {
        check_addr(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
