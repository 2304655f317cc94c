//! Error types for the Aethera staking API.
//!
//! Every failure a request can hit is a `StakingError` variant. Handlers
//! return it with `?` and the `IntoResponse` impl turns it into the
//! `{success: false, error}` envelope with a matching status code.
//!
//! ## Error Groups
//! - Input validation: the caller sent something unusable (400)
//! - State: the vault resource does not exist yet (404)
//! - Math: the reward projection overflowed (500)
//! - Authorization/configuration: no usable admin credential (500)
//! - Node/transaction: the full node failed or rejected the transaction (502)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::handlers::ApiResponse;

#[derive(Debug, Error)]
pub enum StakingError {
    // ========== Input Validation Errors ==========
    /// Path or body did not carry an account address.
    #[error("Address is required")]
    MissingAddress,

    /// The address is not a 0x-prefixed hex string of at most 32 bytes.
    #[error("Invalid account address: {0}")]
    InvalidAddress(String),

    /// Stake or deposit request without an amount.
    #[error("Amount is required")]
    MissingAmount,

    /// Stake or deposit of nothing.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Amount is not a non-negative integer (octas) or decimal (APT).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Simulation request without a lock duration.
    #[error("Duration is required")]
    MissingDuration,

    /// Lock duration is neither a preset label nor whole seconds.
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Config request without an APY rate.
    #[error("APY rate is required")]
    MissingApyRate,

    /// Stake larger than the wallet's available balance.
    #[error("Amount {requested} exceeds available balance {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Body is not valid JSON for the endpoint.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // ========== State Errors ==========
    /// The vault resource is absent at the configured authority.
    #[error("Vault not initialized")]
    VaultNotInitialized,

    // ========== Math Errors ==========
    /// Intermediate product of the reward formula exceeded u128.
    #[error("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// Result does not fit in u64.
    #[error("Integer conversion failed - value out of range")]
    ConversionOverflow,

    // ========== Authorization / Configuration Errors ==========
    /// Admin endpoint called while no signing key is configured.
    #[error("Admin credentials not configured")]
    AdminCredentialsMissing,

    /// ADMIN_PRIVATE_KEY is set but is not a 32-byte Ed25519 key.
    #[error("Invalid admin private key: {0}")]
    InvalidAdminKey(String),

    /// Missing or malformed environment variable.
    #[error("Configuration error: {0}")]
    Config(String),

    // ========== Node / Transaction Errors ==========
    /// Transport failure or non-success status from the full node.
    #[error("Node request failed: {0}")]
    Node(String),

    /// The node answered with a body we could not interpret.
    #[error("Unexpected node response: {0}")]
    UnexpectedResponse(String),

    /// Transaction was committed but the VM reported failure.
    #[error("Transaction {hash} failed: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    /// Transaction was not committed before the confirmation timeout.
    #[error("Timed out waiting for transaction {0}")]
    TransactionTimeout(String),
}

impl StakingError {
    pub fn status(&self) -> StatusCode {
        match self {
            StakingError::MissingAddress
            | StakingError::InvalidAddress(_)
            | StakingError::MissingAmount
            | StakingError::ZeroAmount
            | StakingError::InvalidAmount(_)
            | StakingError::InsufficientBalance { .. }
            | StakingError::MissingDuration
            | StakingError::InvalidDuration(_)
            | StakingError::MissingApyRate
            | StakingError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            StakingError::VaultNotInitialized => StatusCode::NOT_FOUND,
            StakingError::MathOverflow
            | StakingError::ConversionOverflow
            | StakingError::AdminCredentialsMissing
            | StakingError::InvalidAdminKey(_)
            | StakingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StakingError::Node(_)
            | StakingError::UnexpectedResponse(_)
            | StakingError::TransactionFailed { .. }
            | StakingError::TransactionTimeout(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for StakingError {
    fn from(err: reqwest::Error) -> Self {
        StakingError::Node(err.to_string())
    }
}

impl IntoResponse for StakingError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(ApiResponse::<()>::failure(self.to_string()))).into_response()
    }
}
