//! Terminal staking dashboard.
//!
//! `aethera-staking-watch [ADDRESS]` polls the API and prints vault stats
//! and, when an address is given, that wallet's stake and lock countdown.
//! Commands typed on stdin drive the stake form:
//!
//! ```text
//! sim <apt> <duration>     preview rewards (debounced)
//! check <apt>              validate an amount against the wallet balance
//! max                      largest stakeable amount after the gas reserve
//! stake <apt> <duration>   print the wallet payload, then re-poll
//! unstake | claim          print the wallet payload, then re-poll
//! presets | refresh | quit
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use aethera_staking::chain::{Contract, EntryFunctionPayload};
use aethera_staking::config::DashboardConfig;
use aethera_staking::constants::{
    COUNTDOWN_TICK_SECS, DURATION_PRESETS, POST_TX_REFRESH_MS, SIMULATE_DEBOUNCE_MS,
};
use aethera_staking::dashboard::format::{
    format_apt, format_duration, format_timestamp, lock_progress_percent,
};
use aethera_staking::dashboard::input::{
    max_stakeable_text, parse_duration, validate_stake_amount,
};
use aethera_staking::dashboard::{ApiClient, Dashboard, Feed, PollIntervals, Simulator, StakeDraft};
use aethera_staking::state::AccountAddress;
use aethera_staking::StakingError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = DashboardConfig::from_env().context("loading configuration")?;
    let address: Option<AccountAddress> = std::env::args()
        .nth(1)
        .map(|a| a.parse())
        .transpose()
        .context("parsing wallet address")?;

    let source = Arc::new(ApiClient::new(config.api_url.clone())?);
    let mut dashboard = Dashboard::spawn(
        source.clone(),
        address,
        PollIntervals {
            vault: config.vault_interval,
            player: config.player_interval,
            countdown: Duration::from_secs(COUNTDOWN_TICK_SECS),
        },
    );
    let mut simulator = Simulator::spawn(source, Duration::from_millis(SIMULATE_DEBOUNCE_MS));
    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    println!("Aethera Staking dashboard ({})", config.api_url);

    loop {
        tokio::select! {
            changed = dashboard.vault.changed() => {
                if changed.is_err() { break; }
                match &*dashboard.vault.borrow_and_update() {
                    Feed::Ready(vault) if vault.initialized => println!(
                        "vault: {} APT staked | APY {}% | {} APT available for rewards",
                        format_apt(vault.total_staked),
                        vault.apy_rate,
                        format_apt(vault.vault_balance),
                    ),
                    Feed::Ready(_) => println!("vault: not initialized"),
                    Feed::Unavailable(err) => println!("vault: unavailable ({err})"),
                    Feed::Loading => {}
                }
            }
            changed = dashboard.player.changed(), if address.is_some() => {
                if changed.is_err() { break; }
                match &*dashboard.player.borrow_and_update() {
                    Feed::Ready(player) if player.has_stake => println!(
                        "stake: {} APT since {} | pending {} APT | unlocks {}",
                        format_apt(player.staked_amount),
                        format_timestamp(player.stake_timestamp),
                        format_apt(player.pending_rewards),
                        format_timestamp(player.unlock_timestamp),
                    ),
                    Feed::Ready(_) => println!("stake: none"),
                    Feed::Unavailable(err) => println!("stake: unavailable ({err})"),
                    Feed::Loading => {}
                }
            }
            changed = dashboard.balance.changed(), if address.is_some() => {
                if changed.is_err() { break; }
                if let Feed::Ready(balance) = &*dashboard.balance.borrow_and_update() {
                    println!("wallet: {} APT", format_apt(balance.balance));
                }
            }
            changed = dashboard.countdown.changed(), if address.is_some() => {
                if changed.is_err() { break; }
                let remaining = *dashboard.countdown.borrow_and_update();
                let lock = dashboard
                    .player
                    .borrow()
                    .ready()
                    .map(|p| p.lock_duration)
                    .unwrap_or(0);
                println!(
                    "lock: {} ({}% elapsed)",
                    format_duration(remaining),
                    lock_progress_percent(remaining, lock),
                );
            }
            changed = simulator.preview.changed() => {
                if changed.is_err() { break; }
                match &*simulator.preview.borrow_and_update() {
                    Some(preview) => println!(
                        "preview: {} APT for {} earns {} APT, unlocks {}",
                        format_apt(preview.amount),
                        format_duration(preview.duration_seconds),
                        format_apt(preview.estimated_rewards),
                        format_timestamp(preview.unlock_timestamp),
                    ),
                    None => println!("preview: cleared"),
                }
            }
            line = commands.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let mut words = line.split_whitespace();
                let command = words.next().unwrap_or_default();
                let rest: Vec<&str> = words.collect();
                let outcome = match command {
                    "" => Ok(()),
                    "quit" | "exit" => break,
                    "presets" => {
                        for (label, seconds) in DURATION_PRESETS {
                            println!("  {label:<9} {seconds}s");
                        }
                        Ok(())
                    }
                    "refresh" => {
                        dashboard.refresh();
                        Ok(())
                    }
                    "sim" => draft(&rest).map(|draft| {
                        if !simulator.update(draft) {
                            println!("preview: unavailable");
                        }
                    }),
                    "check" => available(&dashboard).and_then(|balance| {
                        let octas = validate_stake_amount(rest.first().copied().unwrap_or_default(), balance)?;
                        println!("ok: {} APT", format_apt(octas));
                        Ok(())
                    }),
                    "max" => available(&dashboard).map(|balance| {
                        println!("max: {} APT", max_stakeable_text(balance));
                    }),
                    "stake" | "unstake" | "claim" => {
                        wallet_payload(command, &rest, config.contract.as_ref(), &dashboard).map(|payload| {
                            match serde_json::to_string_pretty(&payload) {
                                Ok(json) => println!("{json}"),
                                Err(err) => println!("error: {err}"),
                            }
                            dashboard.refresh_after(Duration::from_millis(POST_TX_REFRESH_MS));
                        })
                    }
                    other => {
                        println!("unknown command {other:?}");
                        Ok(())
                    }
                };
                if let Err(err) = outcome {
                    println!("error: {err}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    Ok(())
}

/// `<apt> <duration>` from the command words.
fn draft(words: &[&str]) -> Result<StakeDraft, StakingError> {
    let amount = words.first().copied().unwrap_or_default().to_string();
    let duration_seconds = parse_duration(&words.get(1..).unwrap_or_default().join(" "))?;
    Ok(StakeDraft {
        amount,
        duration_seconds,
    })
}

/// The connected wallet's balance in octas.
fn available(dashboard: &Dashboard) -> Result<u64, StakingError> {
    dashboard
        .balance
        .borrow()
        .ready()
        .map(|b| b.balance)
        .ok_or(StakingError::MissingAddress)
}

/// The entry-function payload the wallet extension would sign.
fn wallet_payload(
    command: &str,
    words: &[&str],
    contract: Option<&Contract>,
    dashboard: &Dashboard,
) -> Result<EntryFunctionPayload, StakingError> {
    let contract = contract.ok_or_else(|| {
        StakingError::Config("CONTRACT_ADDRESS and VAULT_AUTHORITY_ADDRESS are required".into())
    })?;
    Ok(match command {
        "stake" => {
            let draft = draft(words)?;
            let octas = validate_stake_amount(&draft.amount, available(dashboard)?)?;
            contract.stake(octas, draft.duration_seconds)
        }
        "unstake" => contract.unstake(),
        _ => contract.claim_rewards(),
    })
}
