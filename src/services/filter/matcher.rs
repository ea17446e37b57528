//! Transaction to rule matching.
//!
//! A rule matches a transaction when every predicate present on the rule holds.
//! Predicates are evaluated in a fixed order so that the first failing one can be
//! reported when verbose logging is enabled.

use std::fmt;

use alloy::primitives::U256;

use crate::{
	models::{EVMTransaction, Rule, TransactionCandidate},
	services::filter::helpers::are_same_address,
};

/// The predicate that rejected a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
	FromAddress,
	ToAddress,
	Value,
	Nonce,
	GasPrice,
	GasLimit,
}

impl fmt::Display for Mismatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::FromAddress => "fromAddress",
			Self::ToAddress => "toAddress",
			Self::Value => "value",
			Self::Nonce => "nonce",
			Self::GasPrice => "gasPrice",
			Self::GasLimit => "gasLimit",
		};
		write!(f, "{}", name)
	}
}

/// Returns the first predicate of `rule` that `transaction` fails, if any.
///
/// - `fromAddress` and `toAddress` compare case-insensitively; a transaction
///   without a recipient fails a `toAddress` predicate.
/// - the value predicate applies only when both bounds are present and holds for
///   `valueFrom < value <= valueTo`.
/// - `nonce`, `gasPrice` and `gasLimit` require exact equality; a transaction
///   without a gas price fails a `gasPrice` predicate.
pub fn first_mismatch(transaction: &EVMTransaction, rule: &Rule) -> Option<Mismatch> {
	if let Some(from_address) = &rule.from_address {
		if !are_same_address(from_address, &transaction.sender().to_string()) {
			return Some(Mismatch::FromAddress);
		}
	}

	if let Some(to_address) = &rule.to_address {
		let matches = transaction
			.to()
			.is_some_and(|to| are_same_address(to_address, &to.to_string()));
		if !matches {
			return Some(Mismatch::ToAddress);
		}
	}

	if let (Some(value_from), Some(value_to)) = (rule.value_from, rule.value_to) {
		let value = *transaction.value();
		if !(value > value_from && value <= value_to) {
			return Some(Mismatch::Value);
		}
	}

	if let Some(nonce) = rule.nonce {
		if U256::from(transaction.nonce()) != nonce {
			return Some(Mismatch::Nonce);
		}
	}

	if let Some(gas_price) = rule.gas_price {
		if transaction.gas_price() != Some(&gas_price) {
			return Some(Mismatch::GasPrice);
		}
	}

	if let Some(gas_limit) = rule.gas_limit {
		if *transaction.gas() != gas_limit {
			return Some(Mismatch::GasLimit);
		}
	}

	None
}

/// Returns true iff every predicate present on `rule` holds for `transaction`.
pub fn match_transaction(transaction: &EVMTransaction, rule: &Rule) -> bool {
	first_mismatch(transaction, rule).is_none()
}

/// Evaluates every rule independently and returns the ids of the matching ones in
/// snapshot order.
///
/// With `verbose` set, the predicate rejecting each transaction/rule pair is logged.
pub fn match_transaction_to_rules(
	transaction: &EVMTransaction,
	rules: &[Rule],
	verbose: bool,
) -> Vec<u64> {
	rules
		.iter()
		.filter(|rule| match first_mismatch(transaction, rule) {
			None => true,
			Some(mismatch) => {
				if verbose {
					tracing::info!(
						tx = %transaction.hash(),
						rule = rule.id,
						predicate = %mismatch,
						"Transaction rejected by rule"
					);
				}
				false
			}
		})
		.map(|rule| rule.id)
		.collect()
}

/// Matches every transaction against the snapshot and keeps those matching at least one rule.
pub fn match_transactions(
	transactions: &[EVMTransaction],
	rules: &[Rule],
	verbose: bool,
) -> Vec<TransactionCandidate> {
	transactions
		.iter()
		.filter_map(|transaction| {
			let rule_ids = match_transaction_to_rules(transaction, rules, verbose);
			(!rule_ids.is_empty()).then(|| TransactionCandidate::new(transaction, rule_ids))
		})
		.collect()
}
