//! Parsing utilities
//!
//! Rule predicates and persistence payloads carry 256-bit quantities that arrive
//! either as JSON numbers or as strings. This module holds the serde helpers that
//! accept both forms and the decimal string encoding used on the way out.

use alloy::primitives::U256;
use serde::{de, Deserialize, Deserializer, Serializer};

/// A numeric value as it may appear on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericValue {
	Unsigned(u64),
	Text(String),
}

impl NumericValue {
	fn into_u256(self) -> Result<U256, String> {
		match self {
			Self::Unsigned(number) => Ok(U256::from(number)),
			Self::Text(text) => parse_u256(&text),
		}
	}
}

/// Parses a decimal or `0x`-prefixed hexadecimal string into a `U256`.
pub fn parse_u256(value: &str) -> Result<U256, String> {
	let trimmed = value.trim();
	if trimmed.is_empty() {
		return Err("empty numeric value".to_string());
	}

	let parsed = match trimmed
		.strip_prefix("0x")
		.or_else(|| trimmed.strip_prefix("0X"))
	{
		Some(hex) => U256::from_str_radix(hex, 16),
		None => U256::from_str_radix(trimmed, 10),
	};

	parsed.map_err(|e| format!("invalid numeric value '{}': {}", value, e))
}

/// Deserializes an optional `U256` from a JSON number, a numeric string or null.
pub fn deserialize_optional_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	Option::<NumericValue>::deserialize(deserializer)?
		.map(|value| value.into_u256().map_err(de::Error::custom))
		.transpose()
}

/// Deserializes a `u64` from a JSON number, a numeric string or null (read as zero).
pub fn deserialize_lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	match Option::<NumericValue>::deserialize(deserializer)? {
		None => Ok(0),
		Some(value) => {
			let value = value.into_u256().map_err(de::Error::custom)?;
			u64::try_from(value).map_err(|_| de::Error::custom("value does not fit in 64 bits"))
		}
	}
}

/// Serializes a `U256` as a decimal string.
pub fn serialize_u256_decimal<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.collect_str(value)
}

/// Serializes an optional `U256` as a decimal string or null.
pub fn serialize_optional_u256_decimal<S>(
	value: &Option<U256>,
	serializer: S,
) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match value {
		Some(value) => serializer.collect_str(value),
		None => serializer.serialize_none(),
	}
}
