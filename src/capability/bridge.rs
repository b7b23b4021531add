//! EIP-1193 signer reached over JSON-RPC.
//!
//! Desktop wallets and wallet bridges expose the same request surface a
//! browser extension injects (`eth_requestAccounts`,
//! `wallet_switchEthereumChain`, ...). This capability forwards each
//! operation as a single JSON-RPC call with a deadline.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::rpc::client::{ClientBuilder, RpcClient};
use alloy::transports::TransportError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::time::timeout;

use crate::blockchain::{ChainId, NetworkDescriptor};
use crate::capability::{CapabilityError, CapabilityResult, SignerCapability};
use crate::config::schema::SignerConfig;

/// Signer capability backed by a JSON-RPC wallet endpoint.
pub struct BridgeCapability {
    client: RpcClient,
    url: String,
    timeout_duration: Duration,
}

impl BridgeCapability {
    /// Create a capability for the configured bridge URL.
    pub fn new(config: &SignerConfig) -> CapabilityResult<Self> {
        let url: url::Url = config.bridge_url.parse().map_err(|e| {
            CapabilityError::Transport(format!("Invalid bridge URL '{}': {}", config.bridge_url, e))
        })?;

        Ok(Self {
            client: ClientBuilder::default().http(url),
            url: config.bridge_url.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
        target: ChainId,
    ) -> CapabilityResult<T> {
        tracing::debug!(method, url = %self.url, "Signer request");

        let fut = self.client.request::<Value, Value>(method, params);
        let raw = match timeout(self.timeout_duration, fut).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return Err(classify(e, target)),
            Err(_) => {
                return Err(CapabilityError::Transport(format!(
                    "{} timed out after {}s",
                    method,
                    self.timeout_duration.as_secs()
                )))
            }
        };

        serde_json::from_value(raw).map_err(|e| CapabilityError::Rpc {
            code: -32700,
            message: format!("Malformed {} result: {}", method, e),
        })
    }
}

fn classify(error: TransportError, target: ChainId) -> CapabilityError {
    match error.as_error_resp() {
        Some(payload) => CapabilityError::from_code(payload.code, payload.message.to_string(), target),
        None => CapabilityError::Transport(error.to_string()),
    }
}

#[async_trait]
impl SignerCapability for BridgeCapability {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn chain_id(&self) -> CapabilityResult<ChainId> {
        let raw: String = self.call("eth_chainId", json!([]), ChainId(0)).await?;
        ChainId::parse(&raw).ok_or_else(|| CapabilityError::Rpc {
            code: -32700,
            message: format!("Malformed eth_chainId result: {}", raw),
        })
    }

    async fn switch_chain(&self, chain_id: ChainId) -> CapabilityResult<()> {
        let _: Value = self
            .call(
                "wallet_switchEthereumChain",
                json!([NetworkDescriptor::switch_chain_params(chain_id)]),
                chain_id,
            )
            .await?;
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> CapabilityResult<()> {
        let _: Value = self
            .call(
                "wallet_addEthereumChain",
                json!([network.add_chain_params()]),
                network.id(),
            )
            .await?;
        Ok(())
    }

    async fn request_accounts(&self) -> CapabilityResult<Vec<Address>> {
        self.call("eth_requestAccounts", json!([]), ChainId(0)).await
    }

    async fn balance(&self, address: Address) -> CapabilityResult<U256> {
        self.call("eth_getBalance", json!([address, "latest"]), ChainId(0))
            .await
    }
}

impl std::fmt::Debug for BridgeCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeCapability")
            .field("url", &self.url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
