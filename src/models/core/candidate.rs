//! Persistence payload for matched transactions.

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

use crate::{
	models::EVMTransaction,
	utils::parsing::{serialize_optional_u256_decimal, serialize_u256_decimal},
};

/// A transaction that matched at least one rule, with the ids of the rules it matched.
///
/// 256-bit quantities are written as decimal strings, `nonce` and `type` as JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCandidate {
	pub hash: B256,
	pub to: Option<Address>,
	pub from: Address,
	pub nonce: u64,
	#[serde(serialize_with = "serialize_u256_decimal")]
	pub gas_limit: U256,
	#[serde(
		serialize_with = "serialize_optional_u256_decimal",
		skip_serializing_if = "Option::is_none"
	)]
	pub gas_price: Option<U256>,
	#[serde(serialize_with = "serialize_u256_decimal")]
	pub value: U256,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<u64>,
	pub rule_ids: Vec<u64>,
}

impl TransactionCandidate {
	/// Builds a candidate from a block transaction and the ids of the rules it matched.
	pub fn new(transaction: &EVMTransaction, rule_ids: Vec<u64>) -> Self {
		Self {
			hash: *transaction.hash(),
			to: transaction.to().copied(),
			from: *transaction.sender(),
			nonce: transaction.nonce(),
			gas_limit: *transaction.gas(),
			gas_price: transaction.gas_price().copied(),
			value: *transaction.value(),
			transaction_type: transaction.transaction_type(),
			rule_ids,
		}
	}
}

/// Body of `POST /transactions/batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchInsertRequest<'a> {
	pub transactions: &'a [TransactionCandidate],
}
