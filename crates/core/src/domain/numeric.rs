//! Lenient numeric coercion for externally produced pricing data.
//!
//! Vendor extractions and restored snapshots routinely carry numbers as strings,
//! with thousands separators, or not at all. None of that is allowed to fail a
//! calculation: unreadable values coerce to a neutral default instead.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses a free-form numeric string. Returns `None` for anything unreadable.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|ch| *ch != ',' && *ch != '_').collect();
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).or_else(|_| Decimal::from_scientific(&cleaned)).ok()
}

/// Coerces a JSON value into a decimal. Booleans, arrays, objects and null are not numbers.
pub fn coerce(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(raw) => parse_decimal(raw),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerces a decimal into a non-negative whole count, truncating fractions.
pub fn to_count(value: Decimal) -> u32 {
    if value.is_sign_negative() {
        return 0;
    }
    value.trunc().to_u32().unwrap_or(u32::MAX)
}

/// `serde(deserialize_with)` adapters. Pair each with `#[serde(default)]` so a
/// missing field takes the same path as an unreadable one.
pub mod lenient {
    use super::*;

    pub fn zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).unwrap_or(Decimal::ZERO))
    }

    pub fn one<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).unwrap_or(Decimal::ONE))
    }

    pub fn optional<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value))
    }

    pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).map(to_count).unwrap_or(0))
    }

    pub fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).map(to_count))
    }

    /// Accepts a list of strings, dropping non-string entries; null reads as empty.
    pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let strings = match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
            Value::String(text) => vec![text],
            _ => Vec::new(),
        };
        Ok(strings)
    }
}
