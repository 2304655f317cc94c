//! HTTP handlers for the Aethera staking API.
//!
//! One module per endpoint group. Every response, success or failure, uses
//! the `{success, data?, error?}` envelope.

pub mod admin;
pub mod balance;
pub mod health;
pub mod player;
pub mod simulate;
pub mod stats;
pub mod vault;

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chain::ChainClient;
use crate::error::StakingError;
use crate::service::StakingService;
use crate::state::amount::optional_u64;

/// Response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, StakingError>;

pub type SharedService<C> = Arc<StakingService<C>>;

/// Unwrap a JSON body, turning framework rejections into the envelope.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, StakingError> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| StakingError::InvalidBody(rejection.body_text()))
}

/// Read a non-amount u64 field such as a duration or rate.
pub(crate) fn u64_field(
    value: Option<&Value>,
    name: &str,
    missing: StakingError,
) -> Result<u64, StakingError> {
    optional_u64(value)
        .map_err(|_| StakingError::InvalidBody(format!("{name} must be a non-negative integer")))?
        .ok_or(missing)
}

/// Build the router over an already constructed service.
pub fn router<C: ChainClient + 'static>(service: SharedService<C>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/vault/info", get(vault::info::<C>))
        .route("/api/player/:address", get(player::info::<C>))
        .route("/api/stats", get(stats::stats::<C>))
        .route("/api/balance/:address", get(balance::balance::<C>))
        .route("/api/stake/simulate", post(simulate::simulate::<C>))
        .route("/api/admin/config", post(admin::config::<C>))
        .route("/api/admin/deposit", post(admin::deposit::<C>))
        .route("/api/admin/withdraw", post(admin::withdraw::<C>))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// CORS policy: any origin by default, or a single origin with credentials.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, StakingError> {
    let headers = [
        header::CONTENT_TYPE,
        header::CACHE_CONTROL,
        header::PRAGMA,
        header::EXPIRES,
    ];
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    Ok(match origin {
        None => CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(methods)
            .allow_headers(headers),
        Some(origin) => {
            let origin = HeaderValue::from_str(origin)
                .map_err(|_| StakingError::Config(format!("invalid CORS_ORIGIN {origin:?}")))?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(methods)
                .allow_headers(headers)
                .allow_credentials(true)
        }
    })
}

async fn not_found() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Route not found")),
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(%detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<()>::failure("Internal server error")),
    )
        .into_response()
}
