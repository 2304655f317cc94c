use axum::extract::State;
use axum::Json;

use super::{ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::state::VaultView;

/// `GET /api/vault/info`
pub async fn info<C: ChainClient>(State(service): State<SharedService<C>>) -> ApiResult<VaultView> {
    Ok(Json(ApiResponse::ok(service.vault_info().await?)))
}
