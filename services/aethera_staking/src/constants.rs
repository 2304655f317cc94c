//! Constants for the Aethera staking API.
//!
//! Time periods, unit scales and the names of the Move module's resources
//! and entry functions.

/// Number of seconds in a day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Number of seconds in a year (365 days, no leap years; the contract uses the same value)
pub const SECONDS_PER_YEAR: u64 = 365 * SECONDS_PER_DAY;

/// APY is stored on chain as a whole percentage
pub const PERCENT_DENOMINATOR: u64 = 100;

/// Decimal places of the APT coin
pub const APT_DECIMALS: u32 = 8;

/// Smallest units (octas) per whole APT
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// APT kept back for gas when the dashboard fills in a "max" stake (0.01 APT)
pub const GAS_RESERVE_OCTAS: u64 = 1_000_000;

/// Move module holding the vault and player resources
pub const STATE_MODULE: &str = "state";

/// Resource name of the vault account
pub const VAULT_RESOURCE: &str = "VaultAccount";

/// Resource name of a player's stake
pub const PLAYER_RESOURCE: &str = "PlayerAccount";

/// Native coin store resource holding an account's APT balance
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Entry functions exposed by the staking module
pub mod entry {
    pub const SOL_STAKE: &str = "sol_stake";
    pub const SOL_UNSTAKE: &str = "sol_unstake";
    pub const CLAIM_REWARDS: &str = "claim_rewards";
    pub const CONFIG: &str = "config";
    pub const DEPOSIT: &str = "deposit";
    pub const WITHDRAW: &str = "withdraw";
}

/// Gas limit for admin transactions
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;

/// Gas unit price used when the node cannot estimate one
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;

/// Seconds until a submitted transaction expires
pub const TRANSACTION_EXPIRATION_SECS: u64 = 600;

/// Seconds to wait for a transaction to be committed
pub const DEFAULT_TX_TIMEOUT_SECS: u64 = 30;

/// Interval between confirmation polls, in milliseconds
pub const TX_POLL_INTERVAL_MS: u64 = 500;

/// Dashboard refresh of vault stats, in seconds
pub const VAULT_POLL_SECS: u64 = 30;

/// Dashboard refresh of the connected player's stake, in seconds
pub const PLAYER_POLL_SECS: u64 = 15;

/// Dashboard countdown tick, in seconds
pub const COUNTDOWN_TICK_SECS: u64 = 1;

/// Quiet period before the dashboard re-runs a stake simulation, in milliseconds
pub const SIMULATE_DEBOUNCE_MS: u64 = 300;

/// Delay before re-polling after the wallet submits a transaction, in milliseconds
pub const POST_TX_REFRESH_MS: u64 = 2_000;

/// Lock duration presets offered by the stake form (label, seconds)
pub const DURATION_PRESETS: [(&str, u64); 6] = [
    ("1 Min", 60),
    ("7 Days", 7 * SECONDS_PER_DAY),
    ("30 Days", 30 * SECONDS_PER_DAY),
    ("90 Days", 90 * SECONDS_PER_DAY),
    ("180 Days", 180 * SECONDS_PER_DAY),
    ("365 Days", SECONDS_PER_YEAR),
];
