//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router for the session API
//! - Wire up middleware (tracing, request timeout)
//! - Serve until the shutdown signal fires

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ListenerConfig;
use crate::http::handlers::{connect, disconnect, get_health, get_network, get_session};
use crate::http::websocket::session_events;
use crate::lifecycle::Shutdown;
use crate::session::WalletSession;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<WalletSession>,
    pub shutdown: Shutdown,
}

/// HTTP server exposing one wallet session.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server for `session`.
    pub fn new(config: &ListenerConfig, session: Arc<WalletSession>, shutdown: Shutdown) -> Self {
        let state = AppState {
            session,
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(config, state);
        Self { router, shutdown }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ListenerConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(get_health))
            .route("/api/v1/network", get(get_network))
            .route("/api/v1/session", get(get_session))
            .route("/api/v1/session/connect", post(connect))
            .route("/api/v1/session/disconnect", post(disconnect))
            .route("/api/v1/session/events", get(session_events))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving elsewhere or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut shutdown = self.shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
