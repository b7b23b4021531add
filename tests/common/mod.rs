//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use kaia_wallet_session::blockchain::{ChainId, NetworkDescriptor};
use kaia_wallet_session::capability::{CapabilityError, CapabilityResult, SignerCapability};
use kaia_wallet_session::config::PriceConfig;
use kaia_wallet_session::lifecycle::Shutdown;
use kaia_wallet_session::{HttpServer, WalletConfig, WalletSession};

pub const ONE_KAIA: u128 = 1_000_000_000_000_000_000;

pub fn test_account() -> Address {
    Address::repeat_byte(0xab)
}

/// Scriptable stand-in for an injected signer.
pub struct MockCapability {
    chain_id: Mutex<ChainId>,
    switch_results: Mutex<VecDeque<CapabilityResult<()>>>,
    add_result: CapabilityResult<()>,
    accounts: CapabilityResult<Vec<Address>>,
    balance: Mutex<CapabilityResult<U256>>,
    calls: Mutex<Vec<String>>,
    added: Mutex<Vec<NetworkDescriptor>>,
}

impl MockCapability {
    /// A signer on `chain_id` holding `balance_wei` for one account.
    pub fn on_chain(chain_id: u64, balance_wei: u128) -> Self {
        Self {
            chain_id: Mutex::new(ChainId(chain_id)),
            switch_results: Mutex::new(VecDeque::new()),
            add_result: Ok(()),
            accounts: Ok(vec![test_account()]),
            balance: Mutex::new(Ok(U256::from(balance_wei))),
            calls: Mutex::new(Vec::new()),
            added: Mutex::new(Vec::new()),
        }
    }

    /// Results for successive switch requests; unscripted switches succeed.
    pub fn with_switch_results(self, results: Vec<CapabilityResult<()>>) -> Self {
        *self.switch_results.lock().unwrap() = results.into();
        self
    }

    pub fn with_add_result(mut self, result: CapabilityResult<()>) -> Self {
        self.add_result = result;
        self
    }

    pub fn with_accounts(mut self, accounts: CapabilityResult<Vec<Address>>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_balance(self, balance: CapabilityResult<U256>) -> Self {
        self.set_balance(balance);
        self
    }

    /// Change what later balance reads return.
    pub fn set_balance(&self, balance: CapabilityResult<U256>) {
        *self.balance.lock().unwrap() = balance;
    }

    /// Method names in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == method).count()
    }

    /// Networks passed to `add_chain`.
    pub fn added(&self) -> Vec<NetworkDescriptor> {
        self.added.lock().unwrap().clone()
    }

    /// Change the wallet's active chain behind the session's back.
    pub fn move_to(&self, chain_id: ChainId) {
        *self.chain_id.lock().unwrap() = chain_id;
    }

    pub fn push_switch_result(&self, result: CapabilityResult<()>) {
        self.switch_results.lock().unwrap().push_back(result);
    }

    pub fn current_chain(&self) -> ChainId {
        *self.chain_id.lock().unwrap()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl SignerCapability for MockCapability {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chain_id(&self) -> CapabilityResult<ChainId> {
        self.record("chain_id");
        Ok(self.current_chain())
    }

    async fn switch_chain(&self, chain_id: ChainId) -> CapabilityResult<()> {
        self.record("switch_chain");
        let result = self.switch_results.lock().unwrap().pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            *self.chain_id.lock().unwrap() = chain_id;
        }
        result
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> CapabilityResult<()> {
        self.record("add_chain");
        self.added.lock().unwrap().push(network.clone());
        self.add_result.clone()
    }

    async fn request_accounts(&self) -> CapabilityResult<Vec<Address>> {
        self.record("request_accounts");
        self.accounts.clone()
    }

    async fn balance(&self, _address: Address) -> CapabilityResult<U256> {
        self.record("balance");
        self.balance.lock().unwrap().clone()
    }
}

pub fn unrecognized() -> CapabilityError {
    CapabilityError::UnrecognizedChain(ChainId(1001))
}

/// Start a programmable HTTP backend on an ephemeral port.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Price backend answering every request with the same status and body.
pub async fn start_price_backend(status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend(move || async move { (status, body.to_string()) }).await
}

/// Price config pointing at a local backend, no retries.
pub fn price_config(addr: SocketAddr) -> PriceConfig {
    PriceConfig {
        url: format!("http://{}/api/v3/simple/price", addr),
        timeout_ms: 1000,
        attempt_timeout_ms: 1000,
        max_attempts: 1,
        ..PriceConfig::default()
    }
}

type RpcHandler = dyn Fn(&str, &Value) -> Result<Value, (i64, String)> + Send + Sync;

#[derive(Clone)]
struct RpcState {
    handler: Arc<RpcHandler>,
    log: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn rpc_endpoint(State(state): State<RpcState>, Json(request): Json<Value>) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request["params"].clone();
    state.log.lock().unwrap().push((method.clone(), params.clone()));

    let body = match (state.handler)(&method, &params) {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }),
        Err((code, message)) => json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": { "code": code, "message": message },
        }),
    };
    Json(body)
}

/// Start a JSON-RPC wallet endpoint. Returns its URL and a request log.
pub async fn start_json_rpc_backend<H>(handler: H) -> (String, Arc<Mutex<Vec<(String, Value)>>>)
where
    H: Fn(&str, &Value) -> Result<Value, (i64, String)> + Send + Sync + 'static,
{
    let log = Arc::new(Mutex::new(Vec::new()));
    let state = RpcState {
        handler: Arc::new(handler),
        log: log.clone(),
    };
    let app = Router::new().route("/", post(rpc_endpoint)).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), log)
}

/// Serve `session` on an ephemeral port.
pub async fn start_server(session: Arc<WalletSession>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let server = HttpServer::new(&WalletConfig::default().listener, session, shutdown.clone());
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
