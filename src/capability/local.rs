//! Headless signer holding a local key.
//!
//! Behaves like a freshly installed wallet extension: it starts on the
//! network its home RPC endpoints serve, knows only that network, and
//! answers a switch to anything else with code 4902 until the network
//! has been registered through `add_chain`.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::blockchain::{BlockchainClient, BlockchainError, ChainId, NetworkDescriptor, Wallet};
use crate::capability::{CapabilityError, CapabilityResult, SignerCapability};
use crate::config::schema::SignerConfig;

/// The network a local signer is currently pointed at.
struct ActiveNetwork {
    /// Known once the endpoints have answered `eth_chainId`.
    chain_id: Option<ChainId>,
    client: BlockchainClient,
}

/// Signer capability backed by a local private key.
pub struct LocalCapability {
    wallet: Wallet,
    /// Registered networks by chain id.
    networks: DashMap<u64, NetworkDescriptor>,
    active: RwLock<ActiveNetwork>,
    timeout_duration: Duration,
}

impl LocalCapability {
    /// Create a signer for `wallet` starting on the given home endpoints.
    pub fn new(wallet: Wallet, home_rpc_urls: &[String], timeout_duration: Duration) -> CapabilityResult<Self> {
        let client = BlockchainClient::new(home_rpc_urls, timeout_duration).map_err(transport)?;

        Ok(Self {
            wallet,
            networks: DashMap::new(),
            active: RwLock::new(ActiveNetwork {
                chain_id: None,
                client,
            }),
            timeout_duration,
        })
    }

    /// Load the key from `WALLET_SIGNER_PRIVATE_KEY`.
    pub fn from_env(config: &SignerConfig) -> CapabilityResult<Self> {
        let wallet = Wallet::from_env().map_err(transport)?;
        Self::new(
            wallet,
            &config.local_rpc_urls,
            Duration::from_secs(config.rpc_timeout_secs),
        )
    }

    /// Whether a chain has been registered with this signer.
    pub fn knows(&self, chain_id: ChainId) -> bool {
        self.networks.contains_key(&chain_id.0)
    }

    async fn active_client(&self) -> BlockchainClient {
        self.active.read().await.client.clone()
    }
}

fn transport(e: BlockchainError) -> CapabilityError {
    CapabilityError::Transport(e.to_string())
}

#[async_trait]
impl SignerCapability for LocalCapability {
    fn name(&self) -> &str {
        "local"
    }

    async fn chain_id(&self) -> CapabilityResult<ChainId> {
        let mut active = self.active.write().await;
        if let Some(id) = active.chain_id {
            return Ok(id);
        }

        let id = active.client.get_chain_id().await.map_err(transport)?;
        active.chain_id = Some(id);

        // The home network counts as known once we have seen it.
        self.networks.entry(id.0).or_insert_with(|| NetworkDescriptor {
            chain_id: id.0,
            chain_name: format!("Chain {}", id.0),
            rpc_urls: vec![active.client.primary_url().to_string()],
            block_explorer_urls: Vec::new(),
            ..NetworkDescriptor::default()
        });
        Ok(id)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> CapabilityResult<()> {
        let network = self
            .networks
            .get(&chain_id.0)
            .map(|entry| entry.value().clone())
            .ok_or(CapabilityError::UnrecognizedChain(chain_id))?;

        let client = BlockchainClient::for_network(&network, self.timeout_duration).map_err(transport)?;
        client.verify_chain_id(chain_id).await.map_err(transport)?;

        let mut active = self.active.write().await;
        active.chain_id = Some(chain_id);
        active.client = client;

        tracing::info!(chain_id = %chain_id, name = %network.chain_name, "Local signer switched network");
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> CapabilityResult<()> {
        if network.rpc_urls.is_empty() {
            return Err(CapabilityError::Rpc {
                code: -32602,
                message: "Network has no RPC URLs".to_string(),
            });
        }

        self.networks.insert(network.chain_id, network.clone());
        tracing::info!(chain_id = %network.id(), name = %network.chain_name, "Local signer registered network");
        Ok(())
    }

    async fn request_accounts(&self) -> CapabilityResult<Vec<Address>> {
        Ok(vec![self.wallet.address()])
    }

    async fn balance(&self, address: Address) -> CapabilityResult<U256> {
        self.active_client()
            .await
            .get_balance(address)
            .await
            .map_err(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_signer() -> LocalCapability {
        let wallet = Wallet::from_private_key(TEST_PRIVATE_KEY).unwrap();
        LocalCapability::new(
            wallet,
            &["http://127.0.0.1:1".to_string()],
            Duration::from_millis(500),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_chain_is_unrecognized() {
        let signer = test_signer();
        let err = signer.switch_chain(ChainId(1001)).await.unwrap_err();
        assert_eq!(err, CapabilityError::UnrecognizedChain(ChainId(1001)));
    }

    #[tokio::test]
    async fn test_add_chain_registers() {
        let signer = test_signer();
        assert!(!signer.knows(ChainId(1001)));
        signer.add_chain(&NetworkDescriptor::kairos()).await.unwrap();
        assert!(signer.knows(ChainId(1001)));
    }

    #[tokio::test]
    async fn test_add_chain_requires_rpc_urls() {
        let signer = test_signer();
        let network = NetworkDescriptor {
            rpc_urls: Vec::new(),
            ..NetworkDescriptor::kairos()
        };
        assert!(signer.add_chain(&network).await.is_err());
    }

    #[tokio::test]
    async fn test_accounts_are_local_address() {
        let signer = test_signer();
        let accounts = signer.request_accounts().await.unwrap();
        assert_eq!(
            accounts[0].to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }
}
