//! Conversion between octas and whole APT.
//!
//! All arithmetic is on integers; the display string carries exactly
//! `APT_DECIMALS` fractional digits so parsing it back is lossless.

use crate::constants::{APT_DECIMALS, OCTAS_PER_APT};
use crate::error::StakingError;

/// Render octas as an APT amount with 8 decimals, e.g. `150000000` -> `"1.50000000"`.
pub fn octas_to_apt(octas: u64) -> String {
    format!(
        "{}.{:0width$}",
        octas / OCTAS_PER_APT,
        octas % OCTAS_PER_APT,
        width = APT_DECIMALS as usize
    )
}

/// Parse a decimal APT amount into octas.
///
/// Digits beyond the eighth decimal are truncated, matching how the wallet
/// floors fractional octas. Signs, exponents and separators are rejected.
pub fn apt_to_octas(apt: &str) -> Result<u64, StakingError> {
    let text = apt.trim();
    let invalid = || StakingError::InvalidAmount(apt.to_string());

    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }

    let whole_octas = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| invalid())?
            .checked_mul(OCTAS_PER_APT)
            .ok_or(StakingError::ConversionOverflow)?
    };

    let digits: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(APT_DECIMALS as usize)
        .collect();
    let fraction_octas = digits.parse::<u64>().map_err(|_| invalid())?;

    whole_octas
        .checked_add(fraction_octas)
        .ok_or(StakingError::ConversionOverflow)
}

/// Parse an amount already expressed in octas (an unsigned integer string).
pub fn parse_octas(text: &str) -> Result<u64, StakingError> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StakingError::InvalidAmount(text.to_string()));
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| StakingError::ConversionOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_and_a_half_apt() {
        assert_eq!(apt_to_octas("1.5").unwrap(), 150_000_000);
        assert_eq!(octas_to_apt(150_000_000), "1.50000000");
    }

    #[test]
    fn display_round_trips_exactly() {
        for octas in [0, 1, 99, 100_000_000, 123_456_789_012, u64::MAX] {
            assert_eq!(apt_to_octas(&octas_to_apt(octas)).unwrap(), octas);
        }
    }

    #[test]
    fn truncates_beyond_eight_decimals() {
        assert_eq!(apt_to_octas("0.123456789").unwrap(), 12_345_678);
    }

    #[test]
    fn accepts_partial_forms() {
        assert_eq!(apt_to_octas(".5").unwrap(), 50_000_000);
        assert_eq!(apt_to_octas("2.").unwrap(), 200_000_000);
        assert_eq!(apt_to_octas("0").unwrap(), 0);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", ".", "-1", "1e8", "1,5", "abc", "1.2.3"] {
            assert!(apt_to_octas(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            apt_to_octas("184467440737.09551616"),
            Err(StakingError::ConversionOverflow)
        ));
    }

    #[test]
    fn octas_must_be_integers() {
        assert_eq!(parse_octas("42").unwrap(), 42);
        assert!(parse_octas("4.2").is_err());
        assert!(parse_octas("-4").is_err());
        assert!(parse_octas("").is_err());
    }
}
