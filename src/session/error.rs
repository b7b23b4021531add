//! Session failure taxonomy.

use thiserror::Error;

use crate::capability::CapabilityError;

/// Fatal outcomes of a session operation.
///
/// A failed price lookup is not here: it is absorbed with the default rate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No signer capability is installed.
    #[error("No wallet signer is available")]
    CapabilityUnavailable,

    /// The signer could not be put on the expected network.
    #[error("Network switch failed: {source}")]
    NetworkSwitchFailed {
        #[source]
        source: CapabilityError,
    },

    /// The signer did not give us an account.
    #[error("Address resolution failed: {0}")]
    AddressResolutionFailed(String),

    /// The account balance could not be read or converted.
    #[error("Balance unavailable: {0}")]
    BalanceUnavailable(String),

    /// Another connect on this session has not settled yet.
    #[error("A connect is already in progress")]
    ConnectInProgress,

    /// `disconnect` ran while this connect was in flight.
    #[error("Connect aborted by disconnect")]
    ConnectAborted,
}

impl SessionError {
    /// Stable identifier for API clients and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CapabilityUnavailable => "capability_unavailable",
            Self::NetworkSwitchFailed { .. } => "network_switch_failed",
            Self::AddressResolutionFailed(_) => "address_resolution_failed",
            Self::BalanceUnavailable(_) => "balance_unavailable",
            Self::ConnectInProgress => "connect_in_progress",
            Self::ConnectAborted => "connect_aborted",
        }
    }

    /// Text suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            Self::CapabilityUnavailable => {
                "No wallet found. Please install or unlock a Kaia-compatible wallet.".to_string()
            }
            Self::NetworkSwitchFailed { source } if source.is_user_rejection() => {
                "The network switch was declined in your wallet. Please switch to the Kaia network to continue."
                    .to_string()
            }
            Self::NetworkSwitchFailed { .. } => {
                "Could not switch your wallet to the Kaia network. Please try again.".to_string()
            }
            Self::AddressResolutionFailed(_) => {
                "Could not read your wallet address. Please approve the connection request.".to_string()
            }
            Self::BalanceUnavailable(_) => "Could not read your wallet balance. Please try again.".to_string(),
            Self::ConnectInProgress => "A wallet connection is already in progress.".to_string(),
            Self::ConnectAborted => "The wallet connection was cancelled.".to_string(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_has_distinct_message() {
        let rejected = SessionError::NetworkSwitchFailed {
            source: CapabilityError::UserRejected("User rejected the request.".into()),
        };
        let failed = SessionError::NetworkSwitchFailed {
            source: CapabilityError::Transport("connection refused".into()),
        };
        assert_eq!(rejected.kind(), failed.kind());
        assert_ne!(rejected.user_message(), failed.user_message());
        assert!(rejected.user_message().contains("declined"));
    }

    #[test]
    fn test_display_includes_cause() {
        let err = SessionError::NetworkSwitchFailed {
            source: CapabilityError::Rpc {
                code: -32603,
                message: "boom".into(),
            },
        };
        assert_eq!(err.to_string(), "Network switch failed: Signer error -32603: boom");
    }
}
