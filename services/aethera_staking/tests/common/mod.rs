#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use indexmap::IndexMap;
use serde_json::{json, Value};
use tower::ServiceExt;

use aethera_staking::chain::{AdminSigner, ChainClient, Contract, EntryFunctionPayload, TransactionOutcome};
use aethera_staking::clock::FixedClock;
use aethera_staking::constants::APT_COIN_STORE;
use aethera_staking::handlers::router;
use aethera_staking::state::AccountAddress;
use aethera_staking::{StakingError, StakingService};

pub const ADMIN_KEY: &str = "0x2222222222222222222222222222222222222222222222222222222222222222";
pub const NOW: u64 = 1_700_000_000;

pub fn contract() -> Contract {
    Contract {
        address: "0xa11ce".parse().unwrap(),
        vault_authority: "0xb0b".parse().unwrap(),
    }
}

pub fn player_address() -> AccountAddress {
    "0xf1a7".parse().unwrap()
}

/// In-memory full node.
#[derive(Default)]
pub struct MockChain {
    resources: Mutex<HashMap<AccountAddress, IndexMap<String, Value>>>,
    pub submitted: Mutex<Vec<EntryFunctionPayload>>,
    pub fail_execution: AtomicBool,
    pub node_down: AtomicBool,
}

impl MockChain {
    pub fn put(&self, address: AccountAddress, resource_type: &str, data: Value) {
        self.resources
            .lock()
            .unwrap()
            .entry(address)
            .or_default()
            .insert(resource_type.to_string(), data);
    }

    pub fn with_vault(self, staked: u64, apy_rate: u64, balance: u64) -> Self {
        let c = contract();
        self.put(
            c.vault_authority,
            &c.resource_type("VaultAccount"),
            json!({
                "authority": c.vault_authority.to_string(),
                "staked_amount": staked.to_string(),
                "apy_rate": apy_rate.to_string(),
                "vault_coins": { "value": balance.to_string() }
            }),
        );
        self
    }

    pub fn with_player(self, address: AccountAddress, player: Value) -> Self {
        self.put(address, &contract().resource_type("PlayerAccount"), player);
        self
    }

    pub fn with_balance(self, address: AccountAddress, octas: u64) -> Self {
        self.put(
            address,
            APT_COIN_STORE,
            json!({ "coin": { "value": octas.to_string() }, "frozen": false }),
        );
        self
    }

    pub fn submissions(&self) -> Vec<EntryFunctionPayload> {
        self.submitted.lock().unwrap().clone()
    }

    fn check_node(&self) -> Result<(), StakingError> {
        if self.node_down.load(Ordering::SeqCst) {
            return Err(StakingError::Node("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, StakingError> {
        self.check_node()?;
        Ok(self
            .resources
            .lock()
            .unwrap()
            .get(address)
            .and_then(|r| r.get(resource_type).cloned()))
    }

    async fn account_resources(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<IndexMap<String, Value>>, StakingError> {
        self.check_node()?;
        Ok(self.resources.lock().unwrap().get(address).cloned())
    }

    async fn submit_entry_function(
        &self,
        _signer: &AdminSigner,
        payload: &EntryFunctionPayload,
    ) -> Result<String, StakingError> {
        self.check_node()?;
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(payload.clone());
        Ok(format!("0x{:064x}", submitted.len()))
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionOutcome, StakingError> {
        let failed = self.fail_execution.load(Ordering::SeqCst);
        Ok(TransactionOutcome {
            hash: hash.to_string(),
            success: !failed,
            vm_status: if failed {
                "Move abort in state: E_NOT_AUTHORIZED(0x1)".to_string()
            } else {
                "Executed successfully".to_string()
            },
        })
    }
}

pub fn app(chain: Arc<MockChain>, admin: bool) -> Router {
    let admin = admin.then(|| AdminSigner::from_hex(ADMIN_KEY).unwrap());
    let service = StakingService::new(chain, contract(), admin, Arc::new(FixedClock(NOW)));
    router(Arc::new(service))
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
