//! Chain accessor.
//!
//! Everything the API needs from the Aptos full node: resource reads,
//! admin transaction submission and confirmation. `ChainClient` is the seam
//! the service is generic over; `AptosClient` is the REST implementation.

pub mod aptos;
pub mod payload;
pub mod signer;

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StakingError;
use crate::state::AccountAddress;

pub use aptos::AptosClient;
pub use payload::{Contract, EntryFunctionPayload};
pub use signer::AdminSigner;

/// A committed transaction as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: String,
    /// The VM's execution-success flag.
    pub success: bool,
    pub vm_status: String,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// The `data` of one resource, `None` if the account or resource does not exist.
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, StakingError>;

    /// All resources of an account keyed by type, `None` if the account does not exist.
    async fn account_resources(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<IndexMap<String, Value>>, StakingError>;

    /// Sign `payload` with `signer` and submit it. Returns the transaction hash.
    async fn submit_entry_function(
        &self,
        signer: &AdminSigner,
        payload: &EntryFunctionPayload,
    ) -> Result<String, StakingError>;

    /// Block until `hash` is committed or the client's timeout elapses.
    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionOutcome, StakingError>;
}

#[async_trait]
impl<C: ChainClient + ?Sized> ChainClient for Arc<C> {
    async fn account_resource(
        &self,
        address: &AccountAddress,
        resource_type: &str,
    ) -> Result<Option<Value>, StakingError> {
        (**self).account_resource(address, resource_type).await
    }

    async fn account_resources(
        &self,
        address: &AccountAddress,
    ) -> Result<Option<IndexMap<String, Value>>, StakingError> {
        (**self).account_resources(address).await
    }

    async fn submit_entry_function(
        &self,
        signer: &AdminSigner,
        payload: &EntryFunctionPayload,
    ) -> Result<String, StakingError> {
        (**self).submit_entry_function(signer, payload).await
    }

    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionOutcome, StakingError> {
        (**self).wait_for_transaction(hash).await
    }
}
