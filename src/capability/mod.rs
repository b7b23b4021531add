//! Signer capability subsystem.
//!
//! A signer capability is whatever holds the user's account and can be
//! asked to act on a network: an EIP-1193 wallet reached over JSON-RPC
//! (`bridge.rs`) or a local key with its own network registry
//! (`local.rs`). The session only sees the [`SignerCapability`] trait.
//!
//! # Error codes
//! ```text
//! 4001  user rejected the request       → CapabilityError::UserRejected
//! 4902  chain not known to the signer   → CapabilityError::UnrecognizedChain
//! other                                  → CapabilityError::Rpc
//! ```

pub mod bridge;
pub mod local;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::blockchain::{ChainId, NetworkDescriptor};
use crate::config::schema::{SignerConfig, SignerMode};

pub use bridge::BridgeCapability;
pub use local::LocalCapability;

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;
/// EIP-1193 code for a chain the signer has not been told about.
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

/// Errors reported by a signer capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The signer does not know the requested chain.
    #[error("Unrecognized chain {0}")]
    UnrecognizedChain(ChainId),

    /// The user declined the prompt.
    #[error("User rejected the request: {0}")]
    UserRejected(String),

    /// Any other JSON-RPC error response.
    #[error("Signer error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The signer could not be reached or did not answer in time.
    #[error("Signer transport error: {0}")]
    Transport(String),
}

impl CapabilityError {
    /// Classify a JSON-RPC error response.
    pub fn from_code(code: i64, message: impl Into<String>, chain_id: ChainId) -> Self {
        let message = message.into();
        match code {
            UNRECOGNIZED_CHAIN_CODE => Self::UnrecognizedChain(chain_id),
            USER_REJECTED_CODE => Self::UserRejected(message),
            _ => Self::Rpc { code, message },
        }
    }

    /// EIP-1193 error code, when there is one.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::UnrecognizedChain(_) => Some(UNRECOGNIZED_CHAIN_CODE),
            Self::UserRejected(_) => Some(USER_REJECTED_CODE),
            Self::Rpc { code, .. } => Some(*code),
            Self::Transport(_) => None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected(_))
    }
}

/// Result type for capability calls.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// The operations a session needs from an external signer.
#[async_trait]
pub trait SignerCapability: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Network the signer is currently on.
    async fn chain_id(&self) -> CapabilityResult<ChainId>;

    /// Ask the signer to make `chain_id` active.
    async fn switch_chain(&self, chain_id: ChainId) -> CapabilityResult<()>;

    /// Register a network definition with the signer.
    async fn add_chain(&self, network: &NetworkDescriptor) -> CapabilityResult<()>;

    /// Accounts the user exposes to us, selected account first.
    async fn request_accounts(&self) -> CapabilityResult<Vec<Address>>;

    /// Native balance of `address` in the smallest unit.
    async fn balance(&self, address: Address) -> CapabilityResult<U256>;
}

/// Build the capability selected in config.
///
/// Returns `None` when no signer is available; the session then reports
/// `CapabilityUnavailable` on every connect.
pub fn from_config(config: &SignerConfig) -> Option<Arc<dyn SignerCapability>> {
    match config.mode {
        SignerMode::None => {
            tracing::info!("No signer configured");
            None
        }
        SignerMode::Bridge => match BridgeCapability::new(config) {
            Ok(bridge) => Some(Arc::new(bridge)),
            Err(e) => {
                tracing::error!(error = %e, url = %config.bridge_url, "Signer bridge unavailable");
                None
            }
        },
        SignerMode::Local => match LocalCapability::from_env(config) {
            Ok(local) => Some(Arc::new(local)),
            Err(e) => {
                tracing::error!(error = %e, "Local signer unavailable");
                None
            }
        },
    }
}
