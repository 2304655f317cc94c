//! Reward estimation.
//!
//! The single implementation of the vault's linear interest formula, used
//! both to project a player's pending rewards and to simulate a new stake.

use crate::constants::{PERCENT_DENOMINATOR, SECONDS_PER_YEAR};
use crate::error::StakingError;

/// Estimate the reward accrued by `staked_amount` at `apy_rate` percent over
/// `elapsed_seconds`.
///
/// Uses linear accrual with floor division, the same arithmetic the vault
/// contract pays out with:
/// `reward = staked_amount * apy_rate * elapsed_seconds / (SECONDS_PER_YEAR * 100)`
///
/// # Arguments
/// * `staked_amount` - Stake in octas
/// * `apy_rate` - Annual rate as a whole percentage
/// * `elapsed_seconds` - Seconds since the last reward checkpoint
///
/// # Errors
/// `MathOverflow` if the intermediate product exceeds u128,
/// `ConversionOverflow` if the reward does not fit in u64.
pub fn estimate_reward(
    staked_amount: u64,
    apy_rate: u64,
    elapsed_seconds: u64,
) -> Result<u64, StakingError> {
    if staked_amount == 0 || apy_rate == 0 || elapsed_seconds == 0 {
        return Ok(0);
    }

    let denominator = (SECONDS_PER_YEAR as u128) * (PERCENT_DENOMINATOR as u128);

    let reward = (staked_amount as u128)
        .checked_mul(apy_rate as u128)
        .ok_or(StakingError::MathOverflow)?
        .checked_mul(elapsed_seconds as u128)
        .ok_or(StakingError::MathOverflow)?
        / denominator;

    u64::try_from(reward).map_err(|_| StakingError::ConversionOverflow)
}

/// Seconds between a checkpoint and `now`, zero if the checkpoint is in the future.
pub fn elapsed_since(checkpoint: u64, now: u64) -> u64 {
    now.saturating_sub(checkpoint)
}
