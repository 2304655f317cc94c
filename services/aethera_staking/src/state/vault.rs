use serde::Deserialize;

use super::address::AccountAddress;
use super::amount::u64_string;

/// `state::VaultAccount` as returned by the full node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VaultAccount {
    pub authority: AccountAddress,
    #[serde(with = "u64_string")]
    pub staked_amount: u64,
    #[serde(with = "u64_string")]
    pub apy_rate: u64,
    #[serde(default)]
    pub vault_coins: Coin,
}

impl VaultAccount {
    /// Octas available in the vault for reward payouts.
    pub fn vault_balance(&self) -> u64 {
        self.vault_coins.value
    }
}

/// `0x1::coin::Coin` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Coin {
    #[serde(with = "u64_string")]
    pub value: u64,
}

/// `0x1::coin::CoinStore<AptosCoin>` body; only the balance is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CoinStore {
    pub coin: Coin,
}
