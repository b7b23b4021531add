//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a network's JSON-RPC endpoints
//! - Query chain id and native balances
//! - Fail over to the next endpoint on errors or timeouts

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::network::NetworkDescriptor;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Endpoints backing `providers`, for diagnostics.
    urls: Vec<String>,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client over the given endpoints, primary first.
    ///
    /// Invalid URLs are skipped with a warning; at least one must parse.
    pub fn new(rpc_urls: &[String], timeout_duration: Duration) -> BlockchainResult<Self> {
        let mut providers = Vec::new();
        let mut urls = Vec::new();

        for url_str in rpc_urls {
            match url_str.parse::<url::Url>() {
                Ok(url) => {
                    providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>);
                    urls.push(url_str.clone());
                }
                Err(e) => {
                    tracing::warn!(url = %url_str, error = %e, "Ignoring invalid RPC URL");
                }
            }
        }

        if providers.is_empty() {
            return Err(BlockchainError::Rpc("No usable RPC URL configured".to_string()));
        }

        tracing::debug!(primary = %urls[0], failovers = urls.len() - 1, "Blockchain client created");

        Ok(Self {
            providers,
            urls,
            timeout_duration,
        })
    }

    /// Create a client for every RPC endpoint of a network.
    pub fn for_network(network: &NetworkDescriptor, timeout_duration: Duration) -> BlockchainResult<Self> {
        Self::new(&network.rpc_urls, timeout_duration)
    }

    /// Verify the endpoints serve the expected chain.
    pub async fn verify_chain_id(&self, expected: ChainId) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id != expected {
            return Err(BlockchainError::ChainMismatch {
                expected: expected.0,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the balance of an address in the smallest unit.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get balance".to_string()))
    }

    /// Primary endpoint URL.
    pub fn primary_url(&self) -> &str {
        &self.urls[0]
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_urls", &self.urls)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
