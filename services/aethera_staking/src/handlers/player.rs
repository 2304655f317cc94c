use axum::extract::{Path, State};
use axum::Json;

use super::{ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::state::{AccountAddress, PlayerView};

/// `GET /api/player/:address`
///
/// Addresses that never staked get `has_stake: false`, not an error.
pub async fn info<C: ChainClient>(
    State(service): State<SharedService<C>>,
    Path(address): Path<String>,
) -> ApiResult<PlayerView> {
    let address: AccountAddress = address.parse()?;
    Ok(Json(ApiResponse::ok(service.player_info(&address).await?)))
}
