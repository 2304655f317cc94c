//! Admin endpoints.
//!
//! Each one signs with the server's admin key, submits exactly one
//! transaction and reports only after the chain confirms execution.
//! Without a configured key they fail before anything is submitted.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{json_body, u64_field, ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::error::StakingError;
use crate::state::amount::optional_u64;
use crate::state::TransactionView;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigRequest {
    #[serde(default)]
    pub apy_rate: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub amount: Option<Value>,
}

/// `POST /api/admin/config`
pub async fn config<C: ChainClient>(
    State(service): State<SharedService<C>>,
    body: Result<Json<ConfigRequest>, JsonRejection>,
) -> ApiResult<TransactionView> {
    let request = json_body(body)?;
    let apy_rate = u64_field(
        request.apy_rate.as_ref(),
        "apy_rate",
        StakingError::MissingApyRate,
    )?;
    Ok(Json(ApiResponse::ok(service.update_apy_rate(apy_rate).await?)))
}

/// `POST /api/admin/deposit`
pub async fn deposit<C: ChainClient>(
    State(service): State<SharedService<C>>,
    body: Result<Json<DepositRequest>, JsonRejection>,
) -> ApiResult<TransactionView> {
    let request = json_body(body)?;
    let amount = optional_u64(request.amount.as_ref())?.ok_or(StakingError::MissingAmount)?;
    Ok(Json(ApiResponse::ok(service.deposit(amount).await?)))
}

/// `POST /api/admin/withdraw`
pub async fn withdraw<C: ChainClient>(
    State(service): State<SharedService<C>>,
) -> ApiResult<TransactionView> {
    Ok(Json(ApiResponse::ok(service.withdraw().await?)))
}
