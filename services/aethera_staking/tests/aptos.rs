//! `AptosClient` against a stub full node served on a local port.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use aethera_staking::chain::{AdminSigner, AptosClient, ChainClient, Contract};
use aethera_staking::clock::FixedClock;
use aethera_staking::constants::{DEFAULT_GAS_UNIT_PRICE, TRANSACTION_EXPIRATION_SECS};
use aethera_staking::state::AccountAddress;
use aethera_staking::{StakingError, StakingService};

const ADMIN_KEY: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
const NOW: u64 = 1_700_000_000;
const SIGNING_MESSAGE: &[u8] = b"aptos signing message";
const TX_HASH: &str = "0x00000000000000000000000000000000000000000000000000000000000000aa";

/// Full node serving `/v1` with canned state.
struct StubNode {
    calls: Mutex<Vec<String>>,
    /// Polls of `by_hash` answered before the transaction is indexed.
    unknown_polls: usize,
    /// Polls answered as `pending_transaction` after that.
    pending_polls: usize,
    polls: AtomicUsize,
    success: AtomicBool,
    gas_estimate_down: AtomicBool,
    sender_missing: AtomicBool,
    bodies: Mutex<Vec<Value>>,
}

impl StubNode {
    fn new(unknown_polls: usize, pending_polls: usize) -> Self {
        Self {
            calls: Mutex::default(),
            unknown_polls,
            pending_polls,
            polls: AtomicUsize::new(0),
            success: AtomicBool::new(true),
            gas_estimate_down: AtomicBool::new(false),
            sender_missing: AtomicBool::new(false),
            bodies: Mutex::default(),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

type Node = State<Arc<StubNode>>;

fn not_found(message: &str, code: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": message, "error_code": code, "vm_error_code": null })),
    )
        .into_response()
}

fn contract() -> Contract {
    Contract {
        address: "0xa11ce".parse().unwrap(),
        vault_authority: "0xb0b".parse().unwrap(),
    }
}

fn vault_data() -> Value {
    json!({
        "authority": contract().vault_authority.to_string(),
        "staked_amount": "500000000",
        "apy_rate": "10",
        "vault_coins": { "value": "2000000000" }
    })
}

async fn account(Path(address): Path<AccountAddress>, State(node): Node) -> Response {
    node.record(format!("GET /accounts/{address}"));
    if node.sender_missing.load(Ordering::SeqCst) {
        return not_found("Account not found", "account_not_found");
    }
    Json(json!({ "sequence_number": "7", "authentication_key": address })).into_response()
}

async fn resource(
    Path((address, resource_type)): Path<(AccountAddress, String)>,
    State(node): Node,
) -> Response {
    node.record(format!("GET /accounts/{address}/resource/{resource_type}"));
    if resource_type.ends_with("::state::VaultAccount") {
        return Json(json!({ "type": resource_type, "data": vault_data() })).into_response();
    }
    not_found("Resource not found", "resource_not_found")
}

async fn resources(Path(address): Path<AccountAddress>, State(node): Node) -> Response {
    node.record(format!("GET /accounts/{address}/resources"));
    match address.to_string().trim_start_matches("0x").trim_start_matches('0') {
        "bad" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "storage unavailable", "error_code": "internal_error" })),
        )
            .into_response(),
        "dead" => not_found("Account not found", "account_not_found"),
        _ => Json(json!([
            { "type": "0x1::account::Account", "data": { "sequence_number": "7" } },
            {
                "type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
                "data": { "coin": { "value": "150000000" }, "frozen": false }
            },
        ]))
        .into_response(),
    }
}

async fn gas_price(State(node): Node) -> Response {
    node.record("GET /estimate_gas_price".to_string());
    if node.gas_estimate_down.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "overloaded").into_response();
    }
    Json(json!({ "gas_estimate": 150, "prioritized_gas_estimate": 200 })).into_response()
}

async fn encode_submission(State(node): Node, Json(body): Json<Value>) -> Response {
    node.record("POST /transactions/encode_submission".to_string());
    node.bodies.lock().unwrap().push(body);
    Json(json!(format!("0x{}", hex::encode(SIGNING_MESSAGE)))).into_response()
}

async fn submit(State(node): Node, Json(body): Json<Value>) -> Response {
    node.record("POST /transactions".to_string());
    node.bodies.lock().unwrap().push(body);
    (
        StatusCode::ACCEPTED,
        Json(json!({ "type": "pending_transaction", "hash": TX_HASH })),
    )
        .into_response()
}

async fn by_hash(Path(hash): Path<String>, State(node): Node) -> Response {
    node.record(format!("GET /transactions/by_hash/{hash}"));
    let poll = node.polls.fetch_add(1, Ordering::SeqCst);
    if poll < node.unknown_polls {
        return not_found("Transaction not found", "transaction_not_found");
    }
    if poll < node.unknown_polls + node.pending_polls {
        return Json(json!({ "type": "pending_transaction", "hash": hash })).into_response();
    }
    let success = node.success.load(Ordering::SeqCst);
    Json(json!({
        "type": "user_transaction",
        "hash": hash,
        "success": success,
        "vm_status": if success {
            "Executed successfully"
        } else {
            "Move abort in state: E_INSUFFICIENT_BALANCE(0x2)"
        },
    }))
    .into_response()
}

/// Serve `node` on an ephemeral port and return its `/v1` base URL.
async fn serve(node: Arc<StubNode>) -> String {
    let app = Router::new()
        .route("/v1/accounts/:address", get(account))
        .route("/v1/accounts/:address/resource/:resource_type", get(resource))
        .route("/v1/accounts/:address/resources", get(resources))
        .route("/v1/estimate_gas_price", get(gas_price))
        .route("/v1/transactions", post(submit))
        .route("/v1/transactions/encode_submission", post(encode_submission))
        .route("/v1/transactions/by_hash/:hash", get(by_hash))
        .with_state(node);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

async fn client(node: &Arc<StubNode>, tx_timeout: Duration) -> AptosClient {
    let base = serve(node.clone()).await;
    AptosClient::new(&base, 200_000, tx_timeout, Arc::new(FixedClock(NOW))).unwrap()
}

fn address(text: &str) -> AccountAddress {
    text.parse().unwrap()
}

#[tokio::test]
async fn missing_resource_is_none() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;

    let resource_type = contract().resource_type("PlayerAccount");
    let found = client
        .account_resource(&address("0xf1a7"), &resource_type)
        .await
        .unwrap();

    assert_eq!(found, None);
    assert_eq!(
        node.calls(),
        vec![format!("GET /accounts/{}/resource/{resource_type}", address("0xf1a7"))]
    );
}

#[tokio::test]
async fn present_resource_yields_its_data() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;

    let found = client
        .account_resource(&contract().vault_authority, &contract().resource_type("VaultAccount"))
        .await
        .unwrap();

    assert_eq!(found, Some(vault_data()));
}

#[tokio::test]
async fn resources_keep_node_order() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;

    let resources = client
        .account_resources(&address("0xf1a7"))
        .await
        .unwrap()
        .unwrap();
    let types: Vec<&str> = resources.keys().map(String::as_str).collect();

    assert_eq!(
        types,
        vec!["0x1::account::Account", "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"]
    );
    assert_eq!(client.account_resources(&address("0xdead")).await.unwrap(), None);
}

#[tokio::test]
async fn node_failure_carries_its_message() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;

    let err = client.account_resources(&address("0xbad")).await.unwrap_err();

    match err {
        StakingError::Node(message) => {
            assert!(message.starts_with("500"), "{message}");
            assert!(message.contains("storage unavailable"), "{message}");
        }
        other => panic!("expected a node error, got {other:?}"),
    }
}

#[tokio::test]
async fn wait_polls_through_unknown_and_pending() {
    let node = Arc::new(StubNode::new(1, 2));
    let client = client(&node, Duration::from_secs(10)).await;

    let outcome = client.wait_for_transaction(TX_HASH).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.hash, TX_HASH);
    assert_eq!(outcome.vm_status, "Executed successfully");
    assert_eq!(node.polls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn committed_failure_reports_the_vm_status() {
    let node = Arc::new(StubNode::new(0, 0));
    node.success.store(false, Ordering::SeqCst);
    let client = client(&node, Duration::from_secs(5)).await;

    let outcome = client.wait_for_transaction(TX_HASH).await.unwrap();

    assert!(!outcome.success);
    assert!(outcome.vm_status.contains("E_INSUFFICIENT_BALANCE"));
}

#[tokio::test]
async fn pending_past_the_deadline_times_out() {
    let node = Arc::new(StubNode::new(0, usize::MAX / 2));
    let client = client(&node, Duration::from_secs(1)).await;

    let err = client.wait_for_transaction(TX_HASH).await.unwrap_err();

    assert!(matches!(err, StakingError::TransactionTimeout(ref hash) if hash == TX_HASH));
    assert!(node.polls.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn submission_is_encoded_then_signed_then_posted() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;
    let signer = AdminSigner::from_hex(ADMIN_KEY).unwrap();
    let sender = signer.address();
    let payload = contract().deposit(1_000);

    let hash = client.submit_entry_function(&signer, &payload).await.unwrap();

    assert_eq!(hash, TX_HASH);
    assert_eq!(
        node.calls(),
        vec![
            format!("GET /accounts/{sender}"),
            "GET /estimate_gas_price".to_string(),
            "POST /transactions/encode_submission".to_string(),
            "POST /transactions".to_string(),
        ]
    );

    let bodies = node.bodies.lock().unwrap().clone();
    let (unsigned, signed) = (&bodies[0], &bodies[1]);
    assert_eq!(unsigned["sender"], sender.to_string());
    assert_eq!(unsigned["sequence_number"], "7");
    assert_eq!(unsigned["gas_unit_price"], "150");
    assert_eq!(unsigned["max_gas_amount"], "200000");
    assert_eq!(
        unsigned["expiration_timestamp_secs"],
        (NOW + TRANSACTION_EXPIRATION_SECS).to_string()
    );
    assert_eq!(unsigned["payload"], serde_json::to_value(&payload).unwrap());
    assert!(unsigned.get("signature").is_none());

    assert_eq!(signed["sequence_number"], "7");
    assert_eq!(signed["payload"], unsigned["payload"]);
    assert_eq!(signed["signature"]["type"], "ed25519_signature");
    assert_eq!(signed["signature"]["public_key"], signer.public_key_hex());
    assert_eq!(signed["signature"]["signature"], signer.sign_hex(SIGNING_MESSAGE));
}

#[tokio::test]
async fn gas_estimate_outage_falls_back_to_default_price() {
    let node = Arc::new(StubNode::new(0, 0));
    node.gas_estimate_down.store(true, Ordering::SeqCst);
    let client = client(&node, Duration::from_secs(5)).await;
    let signer = AdminSigner::from_hex(ADMIN_KEY).unwrap();

    client
        .submit_entry_function(&signer, &contract().withdraw())
        .await
        .unwrap();

    let unsigned = node.bodies.lock().unwrap()[0].clone();
    assert_eq!(unsigned["gas_unit_price"], DEFAULT_GAS_UNIT_PRICE.to_string());
}

#[tokio::test]
async fn unknown_sender_is_never_encoded() {
    let node = Arc::new(StubNode::new(0, 0));
    node.sender_missing.store(true, Ordering::SeqCst);
    let client = client(&node, Duration::from_secs(5)).await;
    let signer = AdminSigner::from_hex(ADMIN_KEY).unwrap();

    let err = client
        .submit_entry_function(&signer, &contract().withdraw())
        .await
        .unwrap_err();

    assert!(matches!(err, StakingError::Node(ref message) if message.contains("does not exist")));
    assert_eq!(node.calls().len(), 1);
    assert!(node.bodies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn service_reads_the_vault_through_the_node() {
    let node = Arc::new(StubNode::new(0, 0));
    let client = client(&node, Duration::from_secs(5)).await;
    let service = StakingService::new(client, contract(), None, Arc::new(FixedClock(NOW)));

    let vault = service.vault_info().await.unwrap();
    assert!(vault.initialized);
    assert_eq!(vault.total_staked, 500_000_000);
    assert_eq!(vault.apy_rate, 10);

    let player = service.player_info(&address("0xf1a7")).await.unwrap();
    assert!(!player.has_stake);

    let balance = service.balance(&address("0xf1a7")).await.unwrap();
    assert_eq!(balance.balance, 150_000_000);
}
