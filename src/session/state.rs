//! The session value shared with presentation layers.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::blockchain::ChainId;
use crate::pricing::PriceQuote;

/// Snapshot of the wallet connection.
///
/// Replaced wholesale on every transition; the default value is the
/// disconnected session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Selected account, absent while disconnected.
    pub address: Option<Address>,
    /// Balance in native units (e.g. 10.5 KAIA). Approximate above 2^53 wei.
    pub native_balance: f64,
    /// `native_balance * quote.rate`.
    pub fiat_estimate: f64,
    pub connected: bool,
    /// Exact balance in the smallest unit as read from the signer.
    pub raw_balance: U256,
    pub chain_id: Option<ChainId>,
    /// Rate used for `fiat_estimate`.
    pub quote: Option<PriceQuote>,
}

impl Session {
    /// A connected session; derives the fiat estimate from the quote.
    pub fn connected(
        address: Address,
        chain_id: ChainId,
        raw_balance: U256,
        native_balance: f64,
        quote: PriceQuote,
    ) -> Self {
        Self {
            address: Some(address),
            native_balance,
            fiat_estimate: native_balance * quote.rate,
            connected: true,
            raw_balance,
            chain_id: Some(chain_id),
            quote: Some(quote),
        }
    }

    /// Coarse status for display.
    pub fn status(&self) -> SessionStatus {
        if self.connected {
            SessionStatus::Connected
        } else {
            SessionStatus::Disconnected
        }
    }
}

/// Lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Disconnected,
    /// A connect is in flight; never stored in [`Session`].
    Connecting,
    Connected,
}
