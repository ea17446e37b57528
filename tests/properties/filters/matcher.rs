use alloy::primitives::U256;
use proptest::{prelude::*, test_runner::Config};
use tx_rule_monitor::{
	models::{EVMTransaction, Rule},
	services::filter::{
		first_mismatch, match_transaction, match_transaction_to_rules, match_transactions,
	},
	utils::tests::builders::rule::RuleBuilder,
};

use crate::properties::strategies::{
	rule_strategy, rules_strategy, transaction_strategy, transactions_strategy,
};

/// Direct evaluation of every predicate present on the rule
fn holds(transaction: &EVMTransaction, rule: &Rule) -> bool {
	let from_ok = rule
		.from_address
		.as_ref()
		.is_none_or(|from| from.eq_ignore_ascii_case(&transaction.sender().to_string()));
	let to_ok = rule.to_address.as_ref().is_none_or(|to| {
		transaction
			.to()
			.is_some_and(|actual| to.eq_ignore_ascii_case(&actual.to_string()))
	});
	let value_ok = match (rule.value_from, rule.value_to) {
		(Some(low), Some(high)) => *transaction.value() > low && *transaction.value() <= high,
		_ => true,
	};
	let nonce_ok = rule
		.nonce
		.is_none_or(|nonce| nonce == U256::from(transaction.nonce()));
	let gas_price_ok = rule
		.gas_price
		.is_none_or(|gas_price| transaction.gas_price() == Some(&gas_price));
	let gas_limit_ok = rule
		.gas_limit
		.is_none_or(|gas_limit| *transaction.gas() == gas_limit);

	from_ok && to_ok && value_ok && nonce_ok && gas_price_ok && gas_limit_ok
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_match_iff_every_predicate_holds(
		transaction in transaction_strategy(),
		rule in rule_strategy(),
	) {
		prop_assert_eq!(match_transaction(&transaction, &rule), holds(&transaction, &rule));
		prop_assert_eq!(
			first_mismatch(&transaction, &rule).is_none(),
			match_transaction(&transaction, &rule)
		);
	}

	#[test]
	fn test_unconstrained_rule_matches_everything(
		transaction in transaction_strategy(),
		id in any::<u64>(),
		block_delay in 0u64..10,
	) {
		let rule = RuleBuilder::new().id(id).block_delay(block_delay).build();
		prop_assert!(match_transaction(&transaction, &rule));
	}

	#[test]
	fn test_value_range_is_open_below_closed_above(
		transaction in transaction_strategy(),
		low in 0u64..64,
		high in 0u64..64,
	) {
		let rule = RuleBuilder::new()
			.value_range(U256::from(low), U256::from(high))
			.build();
		let value = transaction.value().to::<u64>();
		prop_assert_eq!(match_transaction(&transaction, &rule), low < value && value <= high);
	}

	#[test]
	fn test_rule_ids_follow_snapshot_order(
		transaction in transaction_strategy(),
		rules in rules_strategy(),
	) {
		let expected: Vec<u64> = rules
			.iter()
			.filter(|rule| holds(&transaction, rule))
			.map(|rule| rule.id)
			.collect();
		prop_assert_eq!(match_transaction_to_rules(&transaction, &rules, false), expected);
	}

	#[test]
	fn test_candidates_are_transactions_with_matches(
		transactions in transactions_strategy(),
		rules in rules_strategy(),
	) {
		let candidates = match_transactions(&transactions, &rules, false);

		let matched: Vec<_> = transactions
			.iter()
			.filter(|transaction| rules.iter().any(|rule| holds(transaction, rule)))
			.map(|transaction| *transaction.hash())
			.collect();
		let hashes: Vec<_> = candidates.iter().map(|candidate| candidate.hash).collect();

		prop_assert_eq!(hashes, matched);
		prop_assert!(candidates.iter().all(|candidate| !candidate.rule_ids.is_empty()));
	}
}
