//! Kaia wallet session service.
//!
//! Holds one wallet session, reconciles the signer onto the Kaia network,
//! and exposes the session over HTTP.
//!
//! # Architecture Overview
//!
//! ```text
//!   client ──HTTP/WS──▶ http ──▶ session::WalletSession
//!                                   │          │
//!                                   ▼          ▼
//!                           capability     pricing
//!                       (bridge | local)  (HTTP feed, 0.15 fallback)
//!                                   │
//!                                   ▼
//!                              blockchain
//!                      (descriptor, RPC, units)
//!
//!   cross-cutting: config · observability · resilience · lifecycle
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use kaia_wallet_session::config::{load_or_default, ConfigSource};
use kaia_wallet_session::lifecycle::{forward_signals, Shutdown};
use kaia_wallet_session::observability::{logging, metrics};
use kaia_wallet_session::{HttpServer, WalletSession};

#[derive(Parser)]
#[command(name = "kaia-wallet-session")]
#[command(about = "Wallet session service for the Kaia rewards platform", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "wallet-session.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let (config, source) = load_or_default(&args.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("kaia-wallet-session v{} starting", env!("CARGO_PKG_VERSION"));
    if source == ConfigSource::Defaults {
        tracing::warn!(path = %args.config.display(), "Config file not found, using defaults");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        chain_id = %config.network.id(),
        signer = ?config.signer.mode,
        price_feed = config.price.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let session = Arc::new(WalletSession::from_config(&config));
    if !session.has_capability() {
        tracing::warn!("No signer available; connect requests will be refused");
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    tokio::spawn(forward_signals(shutdown.clone()));

    let server = HttpServer::new(&config.listener, session, shutdown);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
