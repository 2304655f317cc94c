//! Periodic refresh of dashboard state.
//!
//! Vault stats, the connected player's stake and the lock countdown run as
//! independent tasks publishing into `watch` channels. There is no ordering
//! between them; a wallet transaction is followed by a delayed re-poll
//! rather than a read-after-write guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, sleep, Instant, MissedTickBehavior};

use super::client::DashboardSource;
use crate::constants::{COUNTDOWN_TICK_SECS, PLAYER_POLL_SECS, VAULT_POLL_SECS};
use crate::state::{AccountAddress, BalanceView, PlayerView, VaultView};

/// Latest known value of a polled resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed<T> {
    Loading,
    Ready(T),
    /// The first fetch failed; carries the error message.
    Unavailable(String),
}

impl<T> Feed<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Feed::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub vault: Duration,
    pub player: Duration,
    pub countdown: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            vault: Duration::from_secs(VAULT_POLL_SECS),
            player: Duration::from_secs(PLAYER_POLL_SECS),
            countdown: Duration::from_secs(COUNTDOWN_TICK_SECS),
        }
    }
}

/// Handle to the running pollers. Dropping it stops them.
pub struct Dashboard {
    pub vault: watch::Receiver<Feed<VaultView>>,
    pub player: watch::Receiver<Feed<PlayerView>>,
    pub balance: watch::Receiver<Feed<BalanceView>>,
    /// Seconds until the player's stake unlocks, ticking down locally.
    pub countdown: watch::Receiver<u64>,
    refresh: Arc<watch::Sender<u64>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Dashboard {
    /// Start polling. Player and balance feeds stay `Loading` when no wallet
    /// address is connected.
    pub fn spawn<S: DashboardSource>(
        source: Arc<S>,
        player: Option<AccountAddress>,
        intervals: PollIntervals,
    ) -> Self {
        let (refresh, _) = watch::channel(0u64);
        let refresh = Arc::new(refresh);
        let (vault_tx, vault_rx) = watch::channel(Feed::Loading);
        let (player_tx, player_rx) = watch::channel(Feed::Loading);
        let (balance_tx, balance_rx) = watch::channel(Feed::Loading);
        let (countdown_tx, countdown_rx) = watch::channel(0u64);

        let mut tasks = Vec::new();

        {
            let source = source.clone();
            tasks.push(tokio::spawn(poll(
                intervals.vault,
                refresh.subscribe(),
                vault_tx,
                move || {
                    let source = source.clone();
                    async move { source.vault_info().await }
                },
            )));
        }

        if let Some(address) = player {
            let (player_source, balance_source) = (source.clone(), source);
            tasks.push(tokio::spawn(poll(
                intervals.player,
                refresh.subscribe(),
                player_tx,
                move || {
                    let source = player_source.clone();
                    async move { source.player_info(&address).await }
                },
            )));
            tasks.push(tokio::spawn(poll(
                intervals.player,
                refresh.subscribe(),
                balance_tx,
                move || {
                    let source = balance_source.clone();
                    async move { source.balance(&address).await }
                },
            )));
            tasks.push(tokio::spawn(countdown(
                intervals.countdown,
                player_rx.clone(),
                countdown_tx,
            )));
        }

        Self {
            vault: vault_rx,
            player: player_rx,
            balance: balance_rx,
            countdown: countdown_rx,
            refresh,
            tasks,
        }
    }

    /// Re-poll every feed now.
    pub fn refresh(&self) {
        self.refresh.send_modify(|generation| *generation += 1);
    }

    /// Re-poll every feed after `delay`, giving a just-submitted wallet
    /// transaction time to land.
    pub fn refresh_after(&self, delay: Duration) {
        let refresh = self.refresh.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            refresh.send_modify(|generation| *generation += 1);
        });
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Fetch on every tick or refresh request until every receiver is gone.
///
/// A failed fetch only replaces the feed if nothing has loaded yet; data
/// already on screen is kept.
async fn poll<T, F, Fut>(
    period: Duration,
    mut refresh: watch::Receiver<u64>,
    tx: watch::Sender<Feed<T>>,
    mut fetch: F,
) where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send,
    Fut: std::future::Future<Output = Result<T, crate::error::StakingError>> + Send,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = refresh.changed() => {
                if changed.is_err() {
                    break;
                }
                ticker.reset();
            }
        }

        match fetch().await {
            Ok(value) => {
                tx.send_replace(Feed::Ready(value));
            }
            Err(err) => {
                tracing::warn!(error = %err, "dashboard refresh failed");
                let message = err.to_string();
                tx.send_if_modified(|feed| {
                    if matches!(feed, Feed::Ready(_)) {
                        false
                    } else {
                        *feed = Feed::Unavailable(message);
                        true
                    }
                });
            }
        }

        if tx.is_closed() {
            break;
        }
    }
}

/// Count the lock down locally, resyncing whenever a fresh player view arrives.
async fn countdown(
    tick: Duration,
    mut player: watch::Receiver<Feed<PlayerView>>,
    tx: watch::Sender<u64>,
) {
    let step = tick.as_secs().max(1);
    let mut ticker = interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tx.send_modify(|remaining| *remaining = remaining.saturating_sub(step));
            }
            changed = player.changed() => {
                if changed.is_err() {
                    break;
                }
                let remaining = player
                    .borrow_and_update()
                    .ready()
                    .map(|view| view.time_remaining)
                    .unwrap_or(0);
                tx.send_replace(remaining);
                ticker.reset();
            }
        }

        if tx.is_closed() {
            break;
        }
    }
}
