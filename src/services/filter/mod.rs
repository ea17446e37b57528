//! Transaction filtering functionality.
//!
//! Implements the matching engine of the pipeline:
//! - Rule applicability gating by confirmation depth
//! - Transaction to rule matching
//! - Address helper functions

mod applicability;
mod matcher;

pub mod helpers;

pub use applicability::{filter_applicable_rules, is_applicable, maximum_block_delay};
pub use matcher::{
	first_mismatch, match_transaction, match_transaction_to_rules, match_transactions, Mismatch,
};
