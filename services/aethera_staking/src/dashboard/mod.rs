//! Dashboard client.
//!
//! Everything the staking dashboard does besides drawing: talking to the
//! API, polling vault and player state, counting down the lock, debouncing
//! simulations and validating the stake form.

pub mod client;
pub mod format;
pub mod input;
pub mod poller;
pub mod simulate;

pub use client::{ApiClient, DashboardSource};
pub use poller::{Dashboard, Feed, PollIntervals};
pub use simulate::{Simulator, StakeDraft};
