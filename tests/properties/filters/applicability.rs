use proptest::{prelude::*, test_runner::Config};
use tx_rule_monitor::services::filter::{
	filter_applicable_rules, is_applicable, maximum_block_delay,
};

use crate::properties::strategies::rules_strategy;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_applicable_exactly_once(
		rules in rules_strategy(),
		count in 1u64..20,
	) {
		let deepest = rules.iter().map(|rule| rule.block_delay).max().unwrap_or(0);
		prop_assert_eq!(maximum_block_delay(&rules), deepest);

		let applicable = filter_applicable_rules(&rules, count);
		prop_assert_eq!(applicable.is_some(), count == deepest + 1);
		if let Some(applicable) = applicable {
			prop_assert_eq!(applicable.len(), rules.len());
		}
	}

	#[test]
	fn test_single_applicable_count(maximum in 0u64..1000) {
		let matching: Vec<u64> = (0..=maximum + 5)
			.filter(|count| is_applicable(*count, maximum))
			.collect();
		prop_assert_eq!(matching, vec![maximum + 1]);
	}
}
