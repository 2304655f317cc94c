//! Display formatting for the dashboard.

use chrono::DateTime;

use crate::constants::SECONDS_PER_DAY;

/// Octas per 0.0001 APT, the finest unit shown on the dashboard.
const DISPLAY_STEP: u128 = 10_000;

/// Time left on a lock: `Unlocked`, `3d 4h`, `5h 12m` or `7m`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "Unlocked".to_string();
    }
    let days = seconds / SECONDS_PER_DAY;
    let hours = (seconds % SECONDS_PER_DAY) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// APT for display: thousands separators, at least 2 and at most 4 decimals,
/// rounded half up at the fourth.
pub fn format_apt(octas: u64) -> String {
    let steps = (octas as u128 + DISPLAY_STEP / 2) / DISPLAY_STEP;
    let whole = steps / 10_000;
    let mut fraction = format!("{:04}", steps % 10_000);
    while fraction.len() > 2 && fraction.ends_with('0') {
        fraction.pop();
    }
    format!("{}.{}", group_thousands(whole), fraction)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Share of the lock that has elapsed, 0–100. A zero-length lock is complete.
pub fn lock_progress_percent(time_remaining: u64, lock_duration: u64) -> u8 {
    if lock_duration == 0 || time_remaining == 0 {
        return 100;
    }
    let remaining = time_remaining.min(lock_duration) as u128 * 100 / lock_duration as u128;
    (100 - remaining) as u8
}

/// Unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
