use serde::Deserialize;

use super::amount::u64_string;
use crate::error::StakingError;
use crate::rewards::{elapsed_since, estimate_reward};

/// `state::PlayerAccount` as returned by the full node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlayerAccount {
    #[serde(with = "u64_string")]
    pub staked_time: u64,
    #[serde(with = "u64_string")]
    pub staked_amount: u64,
    #[serde(with = "u64_string")]
    pub reward_time: u64,
    #[serde(with = "u64_string")]
    pub duration_time: u64,
    #[serde(with = "u64_string")]
    pub reward_amount: u64,
}

impl PlayerAccount {
    pub fn unlock_timestamp(&self) -> u64 {
        self.staked_time.saturating_add(self.duration_time)
    }

    pub fn is_locked(&self, now: u64) -> bool {
        now < self.unlock_timestamp()
    }

    pub fn time_remaining(&self, now: u64) -> u64 {
        self.unlock_timestamp().saturating_sub(now)
    }

    /// Rewards accrued since the last on-chain checkpoint at `apy_rate`.
    pub fn pending_rewards(&self, apy_rate: u64, now: u64) -> Result<u64, StakingError> {
        estimate_reward(
            self.staked_amount,
            apy_rate,
            elapsed_since(self.reward_time, now),
        )
    }
}
