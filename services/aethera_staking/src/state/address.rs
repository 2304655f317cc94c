use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StakingError;

/// A 32-byte Aptos account address.
///
/// Parsed from `0x`-prefixed (or bare) hex of up to 64 digits, left-padded
/// with zeros, so `0x1` and `0x000…01` are the same address. Always
/// displayed in the long form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; 32]);

impl AccountAddress {
    pub const LENGTH: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for AccountAddress {
    type Err = StakingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(StakingError::MissingAddress);
        }
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(StakingError::InvalidAddress(s.to_string()));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| StakingError::InvalidAddress(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_is_left_padded() {
        let one: AccountAddress = "0x1".parse().unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(one, AccountAddress::new(expected));
        assert_eq!(
            one.to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn prefix_is_optional() {
        let a: AccountAddress = "abcd".parse().unwrap();
        let b: AccountAddress = "0xABCD".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            "".parse::<AccountAddress>(),
            Err(StakingError::MissingAddress)
        ));
        assert!(matches!(
            "0x".parse::<AccountAddress>(),
            Err(StakingError::InvalidAddress(_))
        ));
        assert!(matches!(
            "0xnothex".parse::<AccountAddress>(),
            Err(StakingError::InvalidAddress(_))
        ));
        let too_long = format!("0x{}", "1".repeat(65));
        assert!(too_long.parse::<AccountAddress>().is_err());
    }

    #[test]
    fn serde_uses_long_hex_string() {
        let addr: AccountAddress = serde_json::from_str("\"0x2a\"").unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{:0>64}\"", "2a"));
    }
}
