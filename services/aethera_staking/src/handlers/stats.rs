use axum::extract::State;
use axum::Json;

use super::{ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::state::StatsView;

/// `GET /api/stats`
pub async fn stats<C: ChainClient>(State(service): State<SharedService<C>>) -> ApiResult<StatsView> {
    Ok(Json(ApiResponse::ok(service.stats().await?)))
}
