//! State structures for the Aethera staking API.
//!
//! Mirrors of the Move resources read from chain, the account address type
//! and the views returned to API clients.

pub mod address;
pub mod amount;
pub mod player;
pub mod vault;
pub mod views;

pub use address::*;
pub use player::*;
pub use vault::*;
pub use views::*;
