//! JSON-RPC signer bridge against a local wallet endpoint.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde_json::{json, Value};

use common::*;
use kaia_wallet_session::blockchain::{ChainId, NetworkDescriptor};
use kaia_wallet_session::capability::{BridgeCapability, CapabilityError, SignerCapability};
use kaia_wallet_session::config::SignerConfig;
use kaia_wallet_session::{SessionError, WalletSession};

fn bridge(url: &str) -> BridgeCapability {
    let config = SignerConfig {
        bridge_url: url.to_string(),
        rpc_timeout_secs: 5,
        ..SignerConfig::default()
    };
    BridgeCapability::new(&config).unwrap()
}

/// Wallet on chain 0x1 that knows Kairos only after it has been added.
fn wallet_without_kairos() -> impl Fn(&str, &Value) -> Result<Value, (i64, String)> + Send + Sync + 'static {
    let added = Arc::new(AtomicBool::new(false));
    let on_kairos = Arc::new(AtomicBool::new(false));

    move |method, params| match method {
        "eth_chainId" => Ok(json!(if on_kairos.load(Ordering::SeqCst) { "0x3e9" } else { "0x1" })),
        "wallet_switchEthereumChain" => {
            if !added.load(Ordering::SeqCst) {
                return Err((4902, "Unrecognized chain ID \"0x3e9\".".to_string()));
            }
            on_kairos.store(true, Ordering::SeqCst);
            Ok(Value::Null)
        }
        "wallet_addEthereumChain" => {
            if params[0]["chainId"] != "0x3e9" {
                return Err((-32602, "bad params".to_string()));
            }
            added.store(true, Ordering::SeqCst);
            Ok(Value::Null)
        }
        "eth_requestAccounts" => Ok(json!(["0xabababababababababababababababababababab"])),
        // 10 KAIA
        "eth_getBalance" => Ok(json!("0x8ac7230489e80000")),
        _ => Err((-32601, "Method not found".to_string())),
    }
}

#[tokio::test]
async fn test_reads_chain_id_and_accounts() {
    let (url, _) = start_json_rpc_backend(wallet_without_kairos()).await;
    let bridge = bridge(&url);

    assert_eq!(bridge.chain_id().await.unwrap(), ChainId(1));
    assert_eq!(bridge.request_accounts().await.unwrap(), vec![test_account()]);
    assert_eq!(
        bridge.balance(test_account()).await.unwrap(),
        U256::from(10 * ONE_KAIA)
    );
}

#[tokio::test]
async fn test_chain_id_hex_is_case_insensitive() {
    let (url, _) = start_json_rpc_backend(|_, _| Ok(json!("0x3E9"))).await;
    assert_eq!(bridge(&url).chain_id().await.unwrap(), ChainId(1001));
}

#[tokio::test]
async fn test_malformed_chain_id_is_rejected() {
    let (url, _) = start_json_rpc_backend(|_, _| Ok(json!("kairos"))).await;

    let err = bridge(&url).chain_id().await.unwrap_err();
    assert_eq!(err.code(), Some(-32700));
    assert!(err.to_string().contains("kairos"));
}

#[tokio::test]
async fn test_unrecognized_chain_code_is_classified() {
    let (url, _) = start_json_rpc_backend(wallet_without_kairos()).await;
    let bridge = bridge(&url);

    let err = bridge.switch_chain(ChainId(1001)).await.unwrap_err();
    assert_eq!(err, CapabilityError::UnrecognizedChain(ChainId(1001)));
}

#[tokio::test]
async fn test_user_rejection_is_classified() {
    let (url, _) = start_json_rpc_backend(|_, _| Err((4001, "User rejected the request.".to_string()))).await;
    let bridge = bridge(&url);

    let err = bridge.switch_chain(ChainId(1001)).await.unwrap_err();
    assert!(err.is_user_rejection());
    assert_eq!(err.code(), Some(4001));
}

#[tokio::test]
async fn test_other_error_codes_are_kept() {
    let (url, _) = start_json_rpc_backend(|_, _| Err((-32603, "Internal error".to_string()))).await;
    let bridge = bridge(&url);

    let err = bridge.request_accounts().await.unwrap_err();
    assert_eq!(
        err,
        CapabilityError::Rpc {
            code: -32603,
            message: "Internal error".to_string()
        }
    );
}

#[tokio::test]
async fn test_switch_and_add_payloads() {
    let (url, log) = start_json_rpc_backend(wallet_without_kairos()).await;
    let bridge = bridge(&url);

    bridge.add_chain(&NetworkDescriptor::kairos()).await.unwrap();
    bridge.switch_chain(ChainId(1001)).await.unwrap();

    let log = log.lock().unwrap().clone();
    assert_eq!(log[0].0, "wallet_addEthereumChain");
    assert_eq!(log[0].1, json!([NetworkDescriptor::kairos().add_chain_params()]));
    assert_eq!(log[1].0, "wallet_switchEthereumChain");
    assert_eq!(log[1].1, json!([{ "chainId": "0x3e9" }]));
}

#[tokio::test]
async fn test_session_connects_through_bridge() {
    let (url, log) = start_json_rpc_backend(wallet_without_kairos()).await;
    let session = WalletSession::new(NetworkDescriptor::kairos()).with_capability(Arc::new(bridge(&url)));

    let connected = session.connect().await.unwrap();
    assert_eq!(connected.address, Some(Address::repeat_byte(0xab)));
    assert_eq!(connected.chain_id, Some(ChainId(1001)));
    assert_eq!(connected.native_balance, 10.0);
    assert!((connected.fiat_estimate - 1.5).abs() < 1e-9);

    let methods: Vec<String> = log.lock().unwrap().iter().map(|(m, _)| m.clone()).collect();
    assert_eq!(
        methods,
        vec![
            "eth_chainId",
            "wallet_switchEthereumChain",
            "wallet_addEthereumChain",
            "wallet_switchEthereumChain",
            "eth_requestAccounts",
            "eth_getBalance",
        ]
    );
}

#[tokio::test]
async fn test_unreachable_bridge_fails_connect() {
    let session = WalletSession::new(NetworkDescriptor::kairos()).with_capability(Arc::new(bridge("http://127.0.0.1:1")));

    let err = session.connect().await.unwrap_err();
    match err {
        SessionError::NetworkSwitchFailed { source } => assert!(matches!(source, CapabilityError::Transport(_))),
        other => panic!("unexpected error: {:?}", other),
    }
}
