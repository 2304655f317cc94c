//! Staking service.
//!
//! Translates chain resources into API views and relays admin
//! transactions. Constructed once at startup and shared by the handlers.

use std::sync::Arc;

use crate::chain::{AdminSigner, ChainClient, Contract, EntryFunctionPayload};
use crate::clock::Clock;
use crate::constants::{APT_COIN_STORE, PLAYER_RESOURCE, VAULT_RESOURCE};
use crate::error::StakingError;
use crate::rewards::estimate_reward;
use crate::state::{
    AccountAddress, BalanceView, CoinStore, PlayerAccount, PlayerView, SimulationView, StatsView,
    TransactionView, VaultAccount, VaultView,
};
use crate::units::octas_to_apt;

pub struct StakingService<C> {
    chain: C,
    contract: Contract,
    admin: Option<AdminSigner>,
    clock: Arc<dyn Clock>,
}

impl<C: ChainClient> StakingService<C> {
    pub fn new(
        chain: C,
        contract: Contract,
        admin: Option<AdminSigner>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain,
            contract,
            admin,
            clock,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn now(&self) -> u64 {
        self.clock.unix_timestamp()
    }

    /// The raw vault resource, `None` if it has not been initialized.
    async fn vault_account(&self) -> Result<Option<VaultAccount>, StakingError> {
        let resource_type = self.contract.resource_type(VAULT_RESOURCE);
        let data = self
            .chain
            .account_resource(&self.contract.vault_authority, &resource_type)
            .await?;

        match data {
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| StakingError::UnexpectedResponse(format!("{VAULT_RESOURCE}: {e}"))),
            None => {
                tracing::debug!(authority = %self.contract.vault_authority, "vault not initialized");
                Ok(None)
            }
        }
    }

    /// Current vault state.
    pub async fn vault_info(&self) -> Result<VaultView, StakingError> {
        Ok(match self.vault_account().await? {
            Some(vault) => VaultView::from_account(&vault),
            None => VaultView::uninitialized(self.contract.vault_authority),
        })
    }

    /// A player's stake with lock status and pending rewards projected to now.
    ///
    /// An address without a `PlayerAccount` gets the zeroed "no stake" view.
    pub async fn player_info(&self, address: &AccountAddress) -> Result<PlayerView, StakingError> {
        let resource_type = self.contract.resource_type(PLAYER_RESOURCE);
        let Some(data) = self.chain.account_resource(address, &resource_type).await? else {
            tracing::debug!(%address, "player has not staked");
            return Ok(PlayerView::no_stake(*address));
        };
        let player: PlayerAccount = serde_json::from_value(data)
            .map_err(|e| StakingError::UnexpectedResponse(format!("{PLAYER_RESOURCE}: {e}")))?;

        let apy_rate = self.vault_account().await?.map(|vault| vault.apy_rate);
        PlayerView::project(*address, &player, apy_rate, self.now())
    }

    /// Aggregate vault statistics.
    pub async fn stats(&self) -> Result<StatsView, StakingError> {
        Ok(StatsView::from(&self.vault_info().await?))
    }

    /// APT balance of an account; unknown accounts hold nothing.
    pub async fn balance(&self, address: &AccountAddress) -> Result<BalanceView, StakingError> {
        let resources = self.chain.account_resources(address).await?;
        let balance = match resources.as_ref().and_then(|r| r.get(APT_COIN_STORE)) {
            Some(store) => {
                let store: CoinStore = serde_json::from_value(store.clone())
                    .map_err(|e| StakingError::UnexpectedResponse(format!("CoinStore: {e}")))?;
                store.coin.value
            }
            None => 0,
        };
        Ok(BalanceView::new(*address, balance))
    }

    /// Project the reward for staking `amount` octas for `duration_seconds`
    /// at the vault's current APY.
    ///
    /// A zero duration is unlocked immediately and earns nothing.
    pub async fn simulate(
        &self,
        amount: u64,
        duration_seconds: u64,
    ) -> Result<SimulationView, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        let vault = self
            .vault_account()
            .await?
            .ok_or(StakingError::VaultNotInitialized)?;

        // Overflow here comes from caller input, not chain state.
        let unlock_timestamp = self.now().checked_add(duration_seconds).ok_or_else(|| {
            StakingError::InvalidDuration(format!("{duration_seconds} seconds is too long"))
        })?;
        let estimated = estimate_reward(amount, vault.apy_rate, duration_seconds).map_err(|_| {
            StakingError::InvalidAmount(format!(
                "reward on {amount} octas over {duration_seconds} seconds is too large"
            ))
        })?;

        Ok(SimulationView {
            amount,
            duration_seconds,
            apy_rate: vault.apy_rate,
            estimated_rewards: estimated,
            estimated_rewards_apt: octas_to_apt(estimated),
            unlock_timestamp,
        })
    }

    /// Set the vault APY (whole percent).
    pub async fn update_apy_rate(&self, apy_rate: u64) -> Result<TransactionView, StakingError> {
        tracing::info!(apy_rate, "updating APY rate");
        self.execute_admin(self.contract.config(apy_rate), "APY rate updated successfully")
            .await
    }

    /// Deposit `amount` octas of reward liquidity into the vault.
    pub async fn deposit(&self, amount: u64) -> Result<TransactionView, StakingError> {
        if amount == 0 {
            return Err(StakingError::ZeroAmount);
        }
        tracing::info!(amount, apt = %octas_to_apt(amount), "depositing to vault");
        self.execute_admin(self.contract.deposit(amount), "Deposit successful")
            .await
    }

    /// Withdraw the vault's entire balance to the admin.
    pub async fn withdraw(&self) -> Result<TransactionView, StakingError> {
        tracing::info!("withdrawing vault balance");
        self.execute_admin(self.contract.withdraw(), "Withdrawal successful")
            .await
    }

    /// Submit one admin transaction and wait for it to commit.
    ///
    /// Refuses before touching the chain when no admin key is configured.
    /// Success is the VM's execution flag, not the node accepting the submission.
    async fn execute_admin(
        &self,
        payload: EntryFunctionPayload,
        message: &str,
    ) -> Result<TransactionView, StakingError> {
        let signer = self
            .admin
            .as_ref()
            .ok_or(StakingError::AdminCredentialsMissing)?;

        let hash = self.chain.submit_entry_function(signer, &payload).await?;
        let outcome = self.chain.wait_for_transaction(&hash).await?;

        if !outcome.success {
            tracing::error!(
                hash = %outcome.hash,
                vm_status = %outcome.vm_status,
                function = %payload.function,
                "admin transaction failed"
            );
            return Err(StakingError::TransactionFailed {
                hash: outcome.hash,
                vm_status: outcome.vm_status,
            });
        }

        tracing::info!(
            hash = %outcome.hash,
            function = %payload.function,
            admin = %signer.address(),
            "admin transaction committed"
        );
        Ok(TransactionView {
            transaction_hash: outcome.hash,
            success: true,
            vm_status: outcome.vm_status,
            message: message.to_string(),
        })
    }
}
