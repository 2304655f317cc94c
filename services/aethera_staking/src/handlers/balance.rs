use axum::extract::{Path, State};
use axum::Json;

use super::{ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::state::{AccountAddress, BalanceView};

/// `GET /api/balance/:address`
pub async fn balance<C: ChainClient>(
    State(service): State<SharedService<C>>,
    Path(address): Path<String>,
) -> ApiResult<BalanceView> {
    let address: AccountAddress = address.parse()?;
    Ok(Json(ApiResponse::ok(service.balance(&address).await?)))
}
