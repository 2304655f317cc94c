//! Entry-function payloads for the staking module.
//!
//! Admin payloads are signed by the server; the user payloads (stake,
//! unstake, claim) are what the dashboard hands to the wallet extension.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{entry, STATE_MODULE};
use crate::state::AccountAddress;

/// Where the staking module is published and which vault it operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub address: AccountAddress,
    pub vault_authority: AccountAddress,
}

/// JSON form of an entry-function call accepted by the node and by wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
}

impl EntryFunctionPayload {
    fn new(function: String, arguments: Vec<Value>) -> Self {
        Self {
            kind: "entry_function_payload".to_string(),
            function,
            type_arguments: Vec::new(),
            arguments,
        }
    }
}

/// u64 arguments travel as decimal strings.
fn u64_arg(value: u64) -> Value {
    Value::String(value.to_string())
}

fn address_arg(address: &AccountAddress) -> Value {
    Value::String(address.to_string())
}

impl Contract {
    /// Fully qualified type of a resource in the staking module.
    pub fn resource_type(&self, resource: &str) -> String {
        format!("{}::{}::{}", self.address, STATE_MODULE, resource)
    }

    pub fn function(&self, name: &str) -> String {
        format!("{}::{}::{}", self.address, STATE_MODULE, name)
    }

    pub fn stake(&self, amount: u64, duration_seconds: u64) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function(entry::SOL_STAKE),
            vec![
                address_arg(&self.vault_authority),
                u64_arg(amount),
                u64_arg(duration_seconds),
            ],
        )
    }

    pub fn unstake(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function(entry::SOL_UNSTAKE),
            vec![address_arg(&self.vault_authority)],
        )
    }

    pub fn claim_rewards(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function(entry::CLAIM_REWARDS),
            vec![address_arg(&self.vault_authority)],
        )
    }

    pub fn config(&self, apy_rate: u64) -> EntryFunctionPayload {
        EntryFunctionPayload::new(self.function(entry::CONFIG), vec![u64_arg(apy_rate)])
    }

    pub fn deposit(&self, amount: u64) -> EntryFunctionPayload {
        EntryFunctionPayload::new(
            self.function(entry::DEPOSIT),
            vec![address_arg(&self.vault_authority), u64_arg(amount)],
        )
    }

    pub fn withdraw(&self) -> EntryFunctionPayload {
        EntryFunctionPayload::new(self.function(entry::WITHDRAW), Vec::new())
    }
}
