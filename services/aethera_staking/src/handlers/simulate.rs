use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::{json_body, u64_field, ApiResponse, ApiResult, SharedService};
use crate::chain::ChainClient;
use crate::error::StakingError;
use crate::state::amount::optional_u64;
use crate::state::SimulationView;

/// Body of `POST /api/stake/simulate`. `amount` is in octas, as a number or string.
#[derive(Debug, Default, Deserialize)]
pub struct SimulateRequest {
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub duration_seconds: Option<Value>,
}

/// `POST /api/stake/simulate`
pub async fn simulate<C: ChainClient>(
    State(service): State<SharedService<C>>,
    body: Result<Json<SimulateRequest>, JsonRejection>,
) -> ApiResult<SimulationView> {
    let request = json_body(body)?;

    let amount = optional_u64(request.amount.as_ref())?.ok_or(StakingError::MissingAmount)?;
    let duration = u64_field(
        request.duration_seconds.as_ref(),
        "duration_seconds",
        StakingError::MissingDuration,
    )?;

    Ok(Json(ApiResponse::ok(service.simulate(amount, duration).await?)))
}
