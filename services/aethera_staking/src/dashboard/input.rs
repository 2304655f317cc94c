//! Stake form validation.

use crate::constants::{DURATION_PRESETS, GAS_RESERVE_OCTAS, OCTAS_PER_APT};
use crate::error::StakingError;
use crate::units::apt_to_octas;

/// Whether `text` is an acceptable partial entry: digits with at most one dot.
///
/// Used to filter keystrokes; an empty string or a lone `.` is allowed while typing.
pub fn is_amount_text(text: &str) -> bool {
    text.chars().filter(|&c| c == '.').count() <= 1
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Validate an APT amount against the wallet balance, returning octas.
pub fn validate_stake_amount(text: &str, available_octas: u64) -> Result<u64, StakingError> {
    if text.trim().is_empty() {
        return Err(StakingError::MissingAmount);
    }
    if !is_amount_text(text.trim()) {
        return Err(StakingError::InvalidAmount(text.to_string()));
    }
    let octas = apt_to_octas(text)?;
    if octas == 0 {
        return Err(StakingError::ZeroAmount);
    }
    if octas > available_octas {
        return Err(StakingError::InsufficientBalance {
            requested: octas,
            available: available_octas,
        });
    }
    Ok(octas)
}

/// The "max" fill: balance minus the gas reserve, truncated to 4 decimals.
pub fn max_stakeable_text(available_octas: u64) -> String {
    let stakeable = available_octas.saturating_sub(GAS_RESERVE_OCTAS);
    let step = OCTAS_PER_APT / 10_000;
    let ten_thousandths = stakeable / step;
    format!("{}.{:04}", ten_thousandths / 10_000, ten_thousandths % 10_000)
}

/// Resolve a lock duration from a preset label (`"7 Days"`, `7days`) or whole seconds.
pub fn parse_duration(text: &str) -> Result<u64, StakingError> {
    let wanted: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if wanted.is_empty() {
        return Err(StakingError::MissingDuration);
    }
    if let Some((_, seconds)) = DURATION_PRESETS.iter().find(|(label, _)| {
        label.replace(' ', "").eq_ignore_ascii_case(&wanted)
    }) {
        return Ok(*seconds);
    }
    wanted
        .parse()
        .map_err(|_| StakingError::InvalidDuration(text.to_string()))
}
