//! Response bodies served by the API and decoded by the dashboard client.
//!
//! Amounts are octas encoded as strings, each paired with an `*_apt`
//! display string.

use serde::{Deserialize, Serialize};

use super::address::AccountAddress;
use super::amount::u64_string;
use super::player::PlayerAccount;
use super::vault::VaultAccount;
use crate::error::StakingError;
use crate::units::octas_to_apt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultView {
    pub initialized: bool,
    pub authority: AccountAddress,
    #[serde(with = "u64_string")]
    pub total_staked: u64,
    pub total_staked_apt: String,
    pub apy_rate: u64,
    #[serde(with = "u64_string")]
    pub vault_balance: u64,
    pub vault_balance_apt: String,
}

impl VaultView {
    pub fn from_account(vault: &VaultAccount) -> Self {
        Self {
            initialized: true,
            authority: vault.authority,
            total_staked: vault.staked_amount,
            total_staked_apt: octas_to_apt(vault.staked_amount),
            apy_rate: vault.apy_rate,
            vault_balance: vault.vault_balance(),
            vault_balance_apt: octas_to_apt(vault.vault_balance()),
        }
    }

    /// The vault resource has not been published at `authority` yet.
    pub fn uninitialized(authority: AccountAddress) -> Self {
        Self {
            initialized: false,
            authority,
            total_staked: 0,
            total_staked_apt: octas_to_apt(0),
            apy_rate: 0,
            vault_balance: 0,
            vault_balance_apt: octas_to_apt(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub address: AccountAddress,
    pub has_stake: bool,
    #[serde(with = "u64_string")]
    pub staked_amount: u64,
    pub staked_amount_apt: String,
    pub stake_timestamp: u64,
    pub lock_duration: u64,
    pub unlock_timestamp: u64,
    pub is_locked: bool,
    pub time_remaining: u64,
    pub reward_timestamp: u64,
    #[serde(with = "u64_string")]
    pub reward_amount: u64,
    pub reward_amount_apt: String,
    #[serde(with = "u64_string")]
    pub pending_rewards: u64,
    pub pending_rewards_apt: String,
}

impl PlayerView {
    /// Project a player's stake at `now` against the vault's current APY.
    ///
    /// `apy_rate` is `None` when the vault is not initialized; nothing is
    /// projected then.
    pub fn project(
        address: AccountAddress,
        player: &PlayerAccount,
        apy_rate: Option<u64>,
        now: u64,
    ) -> Result<Self, StakingError> {
        let pending = match apy_rate {
            Some(rate) => player.pending_rewards(rate, now)?,
            None => 0,
        };
        Ok(Self {
            address,
            has_stake: player.staked_amount > 0,
            staked_amount: player.staked_amount,
            staked_amount_apt: octas_to_apt(player.staked_amount),
            stake_timestamp: player.staked_time,
            lock_duration: player.duration_time,
            unlock_timestamp: player.unlock_timestamp(),
            is_locked: player.is_locked(now),
            time_remaining: player.time_remaining(now),
            reward_timestamp: player.reward_time,
            reward_amount: player.reward_amount,
            reward_amount_apt: octas_to_apt(player.reward_amount),
            pending_rewards: pending,
            pending_rewards_apt: octas_to_apt(pending),
        })
    }

    /// An address that has never staked.
    pub fn no_stake(address: AccountAddress) -> Self {
        Self {
            address,
            has_stake: false,
            staked_amount: 0,
            staked_amount_apt: octas_to_apt(0),
            stake_timestamp: 0,
            lock_duration: 0,
            unlock_timestamp: 0,
            is_locked: false,
            time_remaining: 0,
            reward_timestamp: 0,
            reward_amount: 0,
            reward_amount_apt: octas_to_apt(0),
            pending_rewards: 0,
            pending_rewards_apt: octas_to_apt(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsView {
    pub initialized: bool,
    #[serde(with = "u64_string")]
    pub total_staked: u64,
    pub total_staked_apt: String,
    /// Not tracked: counting stakers needs an event index the node does not
    /// provide, so this is always `null`.
    pub total_stakers: Option<u64>,
    pub apy_rate: u64,
    #[serde(with = "u64_string")]
    pub vault_balance: u64,
    pub vault_balance_apt: String,
}

impl From<&VaultView> for StatsView {
    fn from(vault: &VaultView) -> Self {
        Self {
            initialized: vault.initialized,
            total_staked: vault.total_staked,
            total_staked_apt: vault.total_staked_apt.clone(),
            total_stakers: None,
            apy_rate: vault.apy_rate,
            vault_balance: vault.vault_balance,
            vault_balance_apt: vault.vault_balance_apt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    pub address: AccountAddress,
    #[serde(with = "u64_string")]
    pub balance: u64,
    pub balance_apt: String,
}

impl BalanceView {
    pub fn new(address: AccountAddress, balance: u64) -> Self {
        Self {
            address,
            balance,
            balance_apt: octas_to_apt(balance),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationView {
    #[serde(with = "u64_string")]
    pub amount: u64,
    pub duration_seconds: u64,
    pub apy_rate: u64,
    #[serde(with = "u64_string")]
    pub estimated_rewards: u64,
    pub estimated_rewards_apt: String,
    pub unlock_timestamp: u64,
}

/// Outcome of an admin transaction that the chain committed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionView {
    pub transaction_hash: String,
    pub success: bool,
    pub vm_status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_stake_defaults_to_zero_and_unlocked() {
        let view = PlayerView::no_stake(AccountAddress::default());
        assert!(!view.has_stake);
        assert!(!view.is_locked);
        assert_eq!(view.pending_rewards, 0);
        assert_eq!(view.time_remaining, 0);
        assert_eq!(view.pending_rewards_apt, "0.00000000");
    }

    #[test]
    fn amounts_serialize_as_strings() {
        let view = BalanceView::new(AccountAddress::default(), 150_000_000);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["balance"], "150000000");
        assert_eq!(json["balance_apt"], "1.50000000");
    }

    #[test]
    fn stats_leave_stakers_unset() {
        let vault = VaultView::uninitialized(AccountAddress::default());
        let stats = StatsView::from(&vault);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json["total_stakers"].is_null());
    }

    #[test]
    fn projection_without_vault_accrues_nothing() {
        let player = PlayerAccount {
            staked_time: 0,
            staked_amount: 100_000_000,
            reward_time: 0,
            duration_time: 60,
            reward_amount: 7,
        };
        let view = PlayerView::project(AccountAddress::default(), &player, None, 1_000).unwrap();
        assert!(view.has_stake);
        assert_eq!(view.pending_rewards, 0);
        assert_eq!(view.reward_amount, 7);
        assert!(!view.is_locked);
    }
}
