//! Aethera staking API server.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use aethera_staking::chain::AptosClient;
use aethera_staking::clock::{Clock, SystemClock};
use aethera_staking::config::ServerConfig;
use aethera_staking::handlers::{cors_layer, router};
use aethera_staking::StakingService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aethera_staking=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().context("loading configuration")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let chain = AptosClient::new(
        &config.node_url,
        config.max_gas_amount,
        config.tx_timeout,
        clock.clone(),
    )?;

    tracing::info!(
        network = %config.network,
        node = %config.node_url,
        contract = %config.contract.address,
        vault_authority = %config.contract.vault_authority,
        admin = ?config.admin.as_ref().map(|a| a.address()),
        "Aptos client initialized"
    );
    if config.admin.is_none() {
        tracing::warn!("ADMIN_PRIVATE_KEY not set; admin endpoints are disabled");
    }

    let cors = cors_layer(config.cors_origin.as_deref())?;
    let service = Arc::new(StakingService::new(
        chain,
        config.contract,
        config.admin,
        clock,
    ));
    let app = router(service).layer(cors);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, "Aethera Staking API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
