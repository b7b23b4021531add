//! Network descriptors understood by EIP-1193 signers.
//!
//! A descriptor is the full set of parameters a wallet needs to register a
//! chain (`wallet_addEthereumChain`, EIP-3085). The Kairos testnet values
//! are the built-in default and must stay byte-for-byte as published.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::blockchain::types::ChainId;

/// Kaia Kairos testnet chain id (0x3E9).
pub const KAIROS_CHAIN_ID: u64 = 1001;
/// Public Kairos JSON-RPC endpoint.
pub const KAIROS_RPC_URL: &str = "https://public-en-kairos.node.kaia.io";
/// Kairos block explorer.
pub const KAIROS_EXPLORER_URL: &str = "https://kairos.kaiaexplorer.io/";

/// Metadata of a chain's native currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Static description of a network a signer can be asked to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkDescriptor {
    /// Numeric chain id.
    pub chain_id: u64,

    /// Display name shown by the signer.
    pub chain_name: String,

    /// Native currency metadata.
    pub native_currency: NativeCurrency,

    /// JSON-RPC endpoints, primary first.
    pub rpc_urls: Vec<String>,

    /// Block explorer base URLs.
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    /// The Kaia Kairos testnet.
    pub fn kairos() -> Self {
        Self {
            chain_id: KAIROS_CHAIN_ID,
            chain_name: "Kaia Kairos Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "KAIA".to_string(),
                symbol: "KAIA".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![KAIROS_RPC_URL.to_string()],
            block_explorer_urls: vec![KAIROS_EXPLORER_URL.to_string()],
        }
    }

    pub fn id(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// Parameter object for `wallet_addEthereumChain`.
    pub fn add_chain_params(&self) -> Value {
        json!({
            "chainId": self.id().to_hex(),
            "chainName": self.chain_name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_urls,
            "blockExplorerUrls": self.block_explorer_urls,
        })
    }

    /// Parameter object for `wallet_switchEthereumChain`.
    pub fn switch_chain_params(chain_id: ChainId) -> Value {
        json!({ "chainId": chain_id.to_hex() })
    }
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self::kairos()
    }
}
