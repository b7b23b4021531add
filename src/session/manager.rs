//! Wallet session orchestration.
//!
//! # Connect flow
//! ```text
//! capability present?          no  → CapabilityUnavailable
//!   → chain id == target?      no  → switch
//!        switch → 4902             → add network, switch again
//!        any other failure         → NetworkSwitchFailed
//!   → first account                → AddressResolutionFailed on error/empty
//!   → native balance               → BalanceUnavailable on error
//!   → fiat rate (bounded)          → default rate on any failure
//!   → commit Session wholesale, notify subscribers
//! ```
//!
//! Nothing partial is ever written: a connect either commits a full
//! session or, on a fatal error, resets a previously connected session to
//! the disconnected default.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::Address;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{units, ChainId, NetworkDescriptor};
use crate::capability::{self, CapabilityError, SignerCapability};
use crate::config::schema::{WalletConfig, DEFAULT_FIAT_RATE};
use crate::observability::metrics;
use crate::pricing::{CurrencyPair, HttpPriceSource, PriceError, PriceQuote, PriceSource};
use crate::session::error::{SessionError, SessionResult};
use crate::session::state::{Session, SessionStatus};

/// Default overall budget for the price lookup.
const DEFAULT_PRICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Clears the in-flight flag when a connect settles or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A wallet connection owned by one UI/client.
pub struct WalletSession {
    network: NetworkDescriptor,
    capability: Option<Arc<dyn SignerCapability>>,
    price_source: Option<Arc<dyn PriceSource>>,
    pair: CurrencyPair,
    fallback_rate: f64,
    price_timeout: Duration,
    state: watch::Sender<Session>,
    connecting: AtomicBool,
    /// Bumped by every disconnect; a connect only commits in its own epoch.
    epoch: AtomicU64,
}

impl WalletSession {
    /// A disconnected session for `network` with no signer and no feed.
    pub fn new(network: NetworkDescriptor) -> Self {
        let pair = CurrencyPair::new(&network.native_currency.symbol, "USD");
        let (state, _) = watch::channel(Session::default());

        Self {
            network,
            capability: None,
            price_source: None,
            pair,
            fallback_rate: DEFAULT_FIAT_RATE,
            price_timeout: DEFAULT_PRICE_TIMEOUT,
            state,
            connecting: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Wire up signer and price feed as configured.
    pub fn from_config(config: &WalletConfig) -> Self {
        let symbol = config.network.native_currency.symbol.clone();
        let mut session = Self::new(config.network.clone())
            .with_fallback_rate(config.price.default_rate)
            .with_price_timeout(Duration::from_millis(config.price.timeout_ms));
        session.pair = CurrencyPair::new(&symbol, &config.price.vs_currency);

        if let Some(capability) = capability::from_config(&config.signer) {
            session = session.with_capability(capability);
        }

        if config.price.enabled {
            match HttpPriceSource::new(&config.price, &symbol) {
                Ok(source) => session = session.with_price_source(Arc::new(source)),
                Err(e) => tracing::warn!(error = %e, "Price feed disabled, default rate only"),
            }
        }

        session
    }

    pub fn with_capability(mut self, capability: Arc<dyn SignerCapability>) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.pair = source.pair();
        self.price_source = Some(source);
        self
    }

    pub fn with_fallback_rate(mut self, rate: f64) -> Self {
        self.fallback_rate = rate;
        self
    }

    pub fn with_price_timeout(mut self, budget: Duration) -> Self {
        self.price_timeout = budget;
        self
    }

    /// Network the session reconciles the signer to.
    pub fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    /// Current session value.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receive every committed session value.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Whether a connect is in flight.
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_connecting() {
            SessionStatus::Connecting
        } else {
            self.state.borrow().status()
        }
    }

    /// Connect the signer, reconcile its network and price its balance.
    ///
    /// Either commits a fully populated session or returns an error. On
    /// error the session is disconnected: a connected session is reset and
    /// a disconnected one is left untouched.
    pub async fn connect(&self) -> SessionResult<Session> {
        if self
            .connecting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Rejected overlapping connect");
            return Err(SessionError::ConnectInProgress);
        }
        let _in_flight = InFlight(&self.connecting);

        let started = Instant::now();
        let epoch = self.epoch.load(Ordering::SeqCst);
        let span = tracing::info_span!("connect", attempt = %Uuid::new_v4());

        let result = self.run_connect(epoch).instrument(span).await;
        match &result {
            Ok(session) => {
                metrics::record_connect("success", started);
                metrics::record_session_connected(true);
                tracing::info!(
                    address = ?session.address,
                    balance = session.native_balance,
                    fiat = session.fiat_estimate,
                    "Wallet connected"
                );
            }
            Err(e) => {
                metrics::record_connect(e.kind(), started);
                tracing::warn!(error = %e, kind = e.kind(), "Wallet connect failed");
            }
        }
        result
    }

    /// Reset to the disconnected session. Aborts any in-flight connect.
    pub fn disconnect(&self) -> Session {
        self.state.send_modify(|current| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *current = Session::default();
        });
        metrics::record_session_connected(false);
        tracing::info!("Wallet disconnected");
        Session::default()
    }

    async fn run_connect(&self, epoch: u64) -> SessionResult<Session> {
        let result = self.try_connect(epoch).await;
        if result.is_err() {
            self.reset_after_failure(epoch);
        }
        result
    }

    async fn try_connect(&self, epoch: u64) -> SessionResult<Session> {
        let capability = self
            .capability
            .as_deref()
            .ok_or(SessionError::CapabilityUnavailable)?;

        let chain_id = self.ensure_network(capability).await?;
        let address = resolve_address(capability).await?;

        let raw_balance = capability
            .balance(address)
            .await
            .map_err(|e| SessionError::BalanceUnavailable(e.to_string()))?;
        let native_balance = units::to_native_amount(raw_balance, self.network.native_currency.decimals)
            .map_err(|e| SessionError::BalanceUnavailable(e.to_string()))?;

        let quote = self.quote().await;
        let session = Session::connected(address, chain_id, raw_balance, native_balance, quote);

        self.commit(epoch, session)
    }

    /// Make sure the signer is on the configured network.
    async fn ensure_network(&self, capability: &dyn SignerCapability) -> SessionResult<ChainId> {
        let target = self.network.id();
        let current = capability.chain_id().await.map_err(switch_failed)?;
        if current == target {
            return Ok(target);
        }

        tracing::info!(current = %current, target = %target, signer = capability.name(), "Requesting network switch");

        match capability.switch_chain(target).await {
            Ok(()) => metrics::record_network_switch("switched"),
            Err(CapabilityError::UnrecognizedChain(_)) => {
                tracing::info!(target = %target, name = %self.network.chain_name, "Signer does not know network, registering it");
                capability.add_chain(&self.network).await.map_err(|e| {
                    metrics::record_network_switch("add_failed");
                    switch_failed(e)
                })?;
                capability.switch_chain(target).await.map_err(|e| {
                    metrics::record_network_switch("failed");
                    switch_failed(e)
                })?;
                metrics::record_network_switch("added");
            }
            Err(e) => {
                metrics::record_network_switch(if e.is_user_rejection() { "rejected" } else { "failed" });
                return Err(switch_failed(e));
            }
        }

        Ok(target)
    }

    /// Fetch a rate, falling back to the default on any failure.
    async fn quote(&self) -> PriceQuote {
        let Some(source) = &self.price_source else {
            return PriceQuote::fallback(self.pair.clone(), self.fallback_rate);
        };

        let outcome = match timeout(self.price_timeout, source.fetch()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PriceError::Timeout(self.price_timeout.as_millis() as u64)),
        };

        match outcome {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(error = %e, fallback_rate = self.fallback_rate, "Price feed unavailable, using default rate");
                metrics::record_price_fallback(e.reason());
                PriceQuote::fallback(self.pair.clone(), self.fallback_rate)
            }
        }
    }

    /// A fatal failure drops a previously connected session back to the
    /// default. A session that was already disconnected is left alone and
    /// subscribers are not woken.
    fn reset_after_failure(&self, epoch: u64) {
        let reset = self.state.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch || !current.connected {
                return false;
            }
            *current = Session::default();
            true
        });

        if reset {
            metrics::record_session_connected(false);
            tracing::info!("Connected session reset after failed connect");
        }
    }

    fn commit(&self, epoch: u64, session: Session) -> SessionResult<Session> {
        let committed = self.state.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *current = session.clone();
            true
        });

        if committed {
            Ok(session)
        } else {
            Err(SessionError::ConnectAborted)
        }
    }
}

fn switch_failed(source: CapabilityError) -> SessionError {
    SessionError::NetworkSwitchFailed { source }
}

async fn resolve_address(capability: &dyn SignerCapability) -> SessionResult<Address> {
    let accounts = capability
        .request_accounts()
        .await
        .map_err(|e| SessionError::AddressResolutionFailed(e.to_string()))?;

    accounts
        .first()
        .copied()
        .ok_or_else(|| SessionError::AddressResolutionFailed("Signer returned no accounts".to_string()))
}

impl std::fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSession")
            .field("chain_id", &self.network.chain_id)
            .field("signer", &self.capability.as_ref().map(|c| c.name().to_string()))
            .field("pair", &self.pair)
            .field("status", &self.status())
            .finish()
    }
}
