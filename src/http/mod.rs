//! HTTP surface for the wallet session.
//!
//! # Data Flow
//! ```text
//! client
//!     → server.rs (Axum router, tracing, timeout)
//!     → handlers.rs (session snapshot, connect, disconnect, network)
//!     → websocket.rs (session change stream)
//!     → WalletSession
//! ```

pub mod handlers;
pub mod server;
pub mod websocket;

pub use server::{AppState, HttpServer};
