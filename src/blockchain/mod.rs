//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Config (network descriptor, RPC URLs) + env (private key)
//!     → network.rs (descriptor, EIP-3085 parameters)
//!     → wallet.rs (local key loading)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → units.rs (smallest unit → human amount)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod network;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::BlockchainClient;
pub use network::{NativeCurrency, NetworkDescriptor};
pub use types::{BlockchainError, ChainId};
pub use wallet::Wallet;
