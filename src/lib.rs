//! Kaia wallet session library.

pub mod blockchain;
pub mod capability;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pricing;
pub mod resilience;
pub mod session;

pub use config::schema::WalletConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::{Session, SessionError, WalletSession};
