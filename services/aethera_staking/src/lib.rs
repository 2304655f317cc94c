//! # Aethera Staking API
//!
//! A thin HTTP facade over the Aethera staking vault deployed on Aptos.
//! Every state transition (stake, unstake, reward accrual, payouts) happens
//! inside the Move contract; this crate only reads its resources, projects
//! rewards for display and relays admin transactions.
//!
//! ## Features
//! - Vault, player, balance and aggregate stats reads
//! - Linear reward projection matching the contract's floor arithmetic
//! - Stake simulation against the live APY
//! - Admin APY config, deposit and withdraw signed with a server-held key
//! - A polling dashboard client with countdown and debounced simulation
//!
//! ## Reward formula
//! `reward = staked * apy_rate * elapsed / (31_536_000 * 100)`, floored.

pub mod chain;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod handlers;
pub mod rewards;
pub mod service;
pub mod state;
pub mod units;

pub use error::StakingError;
pub use service::StakingService;
