//! Wallet session: the state machine between a client and its signer.
//!
//! # States
//! ```text
//! Disconnected ──connect()──▶ Connecting ──all steps ok──▶ Connected
//!      ▲                          │                            │
//!      ├──── fatal error ◀────────┤                            │
//!      └──── disconnect() ◀───────┴────────────────────────────┘
//! ```
//!
//! `Connecting` is only observable through `is_connecting()`; the stored
//! [`Session`] is either the disconnected default or a complete connected
//! value. Any fatal error during connect ends in the disconnected default,
//! including a reconnect attempted from `Connected`.

pub mod error;
pub mod manager;
pub mod state;

pub use error::{SessionError, SessionResult};
pub use manager::WalletSession;
pub use state::{Session, SessionStatus};
