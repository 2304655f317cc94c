//! Serde helpers for u64 amounts.
//!
//! The Aptos REST API encodes u64 as JSON strings; clients may send either
//! form. Amounts always go out as strings.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

use crate::error::StakingError;
use crate::units::parse_octas;

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(u64),
    Text(String),
}

pub mod u64_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => parse_octas(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Read an optional u64 request field that may be a number or a numeric string.
///
/// Absent, `null` and empty-string fields are `Ok(None)`.
pub fn optional_u64(field: Option<&Value>) -> Result<Option<u64>, StakingError> {
    match field {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| StakingError::InvalidAmount(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_octas(s).map(Some),
        Some(other) => Err(StakingError::InvalidAmount(other.to_string())),
    }
}
