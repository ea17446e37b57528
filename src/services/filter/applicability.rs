//! Confirmation-depth gating of rule snapshots.
//!
//! A snapshot is matched against a block exactly once: in the round where the
//! block's confirmation count equals the deepest `blockDelay` of the snapshot plus one.

use crate::models::Rule;

/// Largest `blockDelay` of the snapshot, 0 for an empty snapshot.
pub fn maximum_block_delay(rules: &[Rule]) -> u64 {
	rules.iter().map(|rule| rule.block_delay).max().unwrap_or(0)
}

/// Returns true when `confirmation_count - maximum_block_delay - 1 == 0`.
pub fn is_applicable(confirmation_count: u64, maximum_block_delay: u64) -> bool {
	maximum_block_delay
		.checked_add(1)
		.is_some_and(|required| required == confirmation_count)
}

/// Returns the whole snapshot when it is applicable at `confirmation_count`, None otherwise.
///
/// An empty snapshot is applicable at a confirmation count of 1.
pub fn filter_applicable_rules(rules: &[Rule], confirmation_count: u64) -> Option<&[Rule]> {
	is_applicable(confirmation_count, maximum_block_delay(rules)).then_some(rules)
}
