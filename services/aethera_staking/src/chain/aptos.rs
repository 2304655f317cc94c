//! Aptos full-node REST client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{sleep, Instant};

use super::payload::EntryFunctionPayload;
use super::signer::AdminSigner;
use super::{ChainClient, TransactionOutcome};
use crate::clock::Clock;
use crate::constants::{DEFAULT_GAS_UNIT_PRICE, TRANSACTION_EXPIRATION_SECS, TX_POLL_INTERVAL_MS};
use crate::error::StakingError;
use crate::state::amount::u64_string;
use crate::state::AccountAddress;

/// Error body returned by the node on non-2xx responses.
#[derive(Debug, Deserialize)]
struct NodeError {
    message: String,
    error_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "type")]
    resource_type: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    #[serde(with = "u64_string")]
    sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct GasEstimate {
    gas_estimate: u64,
}

#[derive(Debug, Deserialize)]
struct PendingTransaction {
    hash: String,
}

#[derive(Debug, Serialize)]
struct TransactionSignature {
    #[serde(rename = "type")]
    kind: &'static str,
    public_key: String,
    signature: String,
}

#[derive(Debug, Serialize)]
struct SubmitTransaction<'a> {
    sender: AccountAddress,
    #[serde(with = "u64_string")]
    sequence_number: u64,
    #[serde(with = "u64_string")]
    max_gas_amount: u64,
    #[serde(with = "u64_string")]
    gas_unit_price: u64,
    #[serde(with = "u64_string")]
    expiration_timestamp_secs: u64,
    payload: &'a EntryFunctionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    signature: Option<TransactionSignature>,
}

pub struct AptosClient {
    http: reqwest::Client,
    base: Url,
    max_gas_amount: u64,
    tx_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl AptosClient {
    pub fn new(
        node_url: &str,
        max_gas_amount: u64,
        tx_timeout: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StakingError> {
        let base = Url::parse(node_url)
            .map_err(|e| StakingError::Config(format!("invalid node URL {node_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StakingError::Config(format!(
                "node URL {node_url} cannot be a base"
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;

        Ok(Self {
            http,
            base,
            max_gas_amount,
            tx_timeout,
            clock,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Decode a response, mapping 404 to `None`.
    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Option<T>, StakingError> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<T>()
                .await
                .map_err(|e| StakingError::UnexpectedResponse(e.to_string()))?;
            return Ok(Some(body));
        }

        let text = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<NodeError>(&text).ok();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(
                error_code = error.as_ref().and_then(|e| e.error_code.as_deref()),
                "node reported not found"
            );
            return Ok(None);
        }

        let message = error.map(|e| e.message).unwrap_or(text);
        tracing::warn!(%status, %message, "node request failed");
        Err(StakingError::Node(format!("{status}: {message}")))
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, StakingError> {
        let response = self.http.get(url).send().await?;
        Self::read(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, StakingError> {
        let response = self.http.post(url.clone()).json(body).send().await?;
        Self::read(response)
            .await?
            .ok_or_else(|| StakingError::Node(format!("{url} not found")))
    }

    async fn sequence_number(&self, address: &AccountAddress) -> Result<u64, StakingError> {
        let account: AccountData = self
            .get(self.url(&["accounts", &address.to_string()]))
            .await?
            .ok_or_else(|| StakingError::Node(format!("account {address} does not exist")))?;
        Ok(account.sequence_number)
    }

    async fn gas_unit_price(&self) -> u64 {
        match self
            .get::<GasEstimate>(self.url(&["estimate_gas_price"]))
            .await
        {
            Ok(Some(estimate)) => estimate.gas_estimate,
            Ok(None) | Err(_) => {
                tracing::warn!(
                    fallback = DEFAULT_GAS_UNIT_PRICE,
                    "gas price estimate unavailable"
                );
                DEFAULT_GAS_UNIT_PRICE
            }
        }
    }
}

#[async_trait]
impl ChainClient for AptosClient {
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, StakingError> {
        let url = self.url(&["accounts", &address.to_string(), "resource", resource_type]);
        let resource: Option<Resource> = self.get(url).await?;
        Ok(resource.map(|r| r.data))
    }

    async fn account_resources(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<IndexMap<String, Value>>, StakingError> {
        let url = self.url(&["accounts", &address.to_string(), "resources"]);
        let resources: Option<Vec<Resource>> = self.get(url).await?;
        Ok(resources.map(|list| {
            list.into_iter()
                .map(|r| (r.resource_type, r.data))
                .collect()
        }))
    }

    async fn submit_entry_function(
        &self,
        signer: &AdminSigner,
        payload: &EntryFunctionPayload,
    ) -> Result<String, StakingError> {
        let sender = signer.address();
        let mut transaction = SubmitTransaction {
            sender,
            sequence_number: self.sequence_number(&sender).await?,
            max_gas_amount: self.max_gas_amount,
            gas_unit_price: self.gas_unit_price().await,
            expiration_timestamp_secs: self.clock.unix_timestamp() + TRANSACTION_EXPIRATION_SECS,
            payload,
            signature: None,
        };

        let encoded: String = self
            .post(self.url(&["transactions", "encode_submission"]), &transaction)
            .await?;
        let message = hex::decode(encoded.trim_start_matches("0x"))
            .map_err(|e| StakingError::UnexpectedResponse(format!("signing message: {e}")))?;

        transaction.signature = Some(TransactionSignature {
            kind: "ed25519_signature",
            public_key: signer.public_key_hex(),
            signature: signer.sign_hex(&message),
        });

        let pending: PendingTransaction = self
            .post(self.url(&["transactions"]), &transaction)
            .await?;

        tracing::info!(
            hash = %pending.hash,
            function = %payload.function,
            sender = %sender,
            sequence_number = transaction.sequence_number,
            "transaction submitted"
        );
        Ok(pending.hash)
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionOutcome, StakingError> {
        let deadline = Instant::now() + self.tx_timeout;
        let url = self.url(&["transactions", "by_hash", hash]);

        loop {
            let txn: Option<Value> = self.get(url.clone()).await?;
            if let Some(txn) = txn {
                if txn["type"] != "pending_transaction" {
                    let success = txn["success"].as_bool().ok_or_else(|| {
                        StakingError::UnexpectedResponse(format!("transaction {hash} has no success flag"))
                    })?;
                    let vm_status = txn["vm_status"].as_str().unwrap_or_default().to_string();
                    return Ok(TransactionOutcome {
                        hash: hash.to_string(),
                        success,
                        vm_status,
                    });
                }
            }

            if Instant::now() >= deadline {
                return Err(StakingError::TransactionTimeout(hash.to_string()));
            }
            sleep(Duration::from_millis(TX_POLL_INTERVAL_MS)).await;
        }
    }
}
