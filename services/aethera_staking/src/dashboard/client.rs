use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::StakingError;
use crate::handlers::ApiResponse;
use crate::state::{AccountAddress, BalanceView, PlayerView, SimulationView, VaultView};

/// What the dashboard reads. Implemented over HTTP by `ApiClient`.
#[async_trait]
pub trait DashboardSource: Send + Sync + 'static {
    async fn vault_info(&self) -> Result<VaultView, StakingError>;

    async fn player_info(&self, address: &AccountAddress) -> Result<PlayerView, StakingError>;

    async fn balance(&self, address: &AccountAddress) -> Result<BalanceView, StakingError>;

    async fn simulate(
        &self,
        amount: u64,
        duration_seconds: u64,
    ) -> Result<SimulationView, StakingError>;
}

/// HTTP client for the staking API.
///
/// Every read carries a `_t` timestamp and no-cache headers so proxies and
/// browsers never serve a stale balance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// `base` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base: impl Into<String>) -> Result<Self, StakingError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    fn cache_buster() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, StakingError> {
        let response = self
            .http
            .get(format!("{}{}", self.base, path))
            .query(&[("_t", Self::cache_buster())])
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StakingError> {
        let status = response.status();
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| StakingError::UnexpectedResponse(format!("{status}: {e}")))?;

        match envelope {
            ApiResponse {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            ApiResponse { error, .. } => Err(StakingError::Node(
                error.unwrap_or_else(|| format!("request failed with {status}")),
            )),
        }
    }
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn vault_info(&self) -> Result<VaultView, StakingError> {
        self.get("/vault/info").await
    }

    async fn player_info(&self, address: &AccountAddress) -> Result<PlayerView, StakingError> {
        self.get(&format!("/player/{address}")).await
    }

    async fn balance(&self, address: &AccountAddress) -> Result<BalanceView, StakingError> {
        self.get(&format!("/balance/{address}")).await
    }

    async fn simulate(
        &self,
        amount: u64,
        duration_seconds: u64,
    ) -> Result<SimulationView, StakingError> {
        let response = self
            .http
            .post(format!("{}/stake/simulate", self.base))
            .json(&json!({
                "amount": amount.to_string(),
                "duration_seconds": duration_seconds,
            }))
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }
}
