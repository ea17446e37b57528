//! Filter rule model.
//!
//! Rules are owned by the rule-management API and read here as immutable
//! snapshots. Every predicate is optional and only applies when present.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::utils::parsing::{deserialize_lenient_u64, deserialize_optional_u256};

/// A user-defined filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
	/// Identifier assigned by the rule-management API
	pub id: u64,

	/// Sender address, compared case-insensitively
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from_address: Option<String>,

	/// Recipient address, compared case-insensitively
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to_address: Option<String>,

	/// Exclusive lower bound of the transferred value
	#[serde(
		default,
		deserialize_with = "deserialize_optional_u256",
		skip_serializing_if = "Option::is_none"
	)]
	pub value_from: Option<U256>,

	/// Inclusive upper bound of the transferred value
	#[serde(
		default,
		deserialize_with = "deserialize_optional_u256",
		skip_serializing_if = "Option::is_none"
	)]
	pub value_to: Option<U256>,

	#[serde(
		default,
		deserialize_with = "deserialize_optional_u256",
		skip_serializing_if = "Option::is_none"
	)]
	pub nonce: Option<U256>,

	#[serde(
		default,
		deserialize_with = "deserialize_optional_u256",
		skip_serializing_if = "Option::is_none"
	)]
	pub gas_price: Option<U256>,

	#[serde(
		default,
		deserialize_with = "deserialize_optional_u256",
		skip_serializing_if = "Option::is_none"
	)]
	pub gas_limit: Option<U256>,

	/// Number of confirmations required on top of the block before it is matched
	#[serde(default, deserialize_with = "deserialize_lenient_u64")]
	pub block_delay: u64,

	#[serde(default = "default_is_active")]
	pub is_active: bool,
}

fn default_is_active() -> bool {
	true
}

impl Rule {
	/// Creates an active rule with no predicates, which matches every transaction.
	pub fn new(id: u64) -> Self {
		Self {
			id,
			is_active: true,
			..Default::default()
		}
	}
}
