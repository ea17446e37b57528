//! Per-block processing unit.
//!
//! A unit handles one `(block_number, confirmation_count)` pair end to end: it reads
//! a fresh rule snapshot, checks applicability, fetches the block body, matches its
//! transactions and persists the matches. It shares nothing mutable with the
//! dispatcher and reports back with a single [`UnitOutcome`].

use std::{collections::HashMap, sync::Arc, time::Duration};

use backon::{BackoffBuilder, ExponentialBuilder, Retryable};
use tracing::instrument;

use crate::{
	services::{
		blockchain::BlockChainClient,
		blockwatcher::BlockWatcherError,
		filter::{filter_applicable_rules, match_transactions, maximum_block_delay},
		persistence::TransactionSink,
		rule_source::RuleSource,
	},
	utils::http::{JitterSetting, RetryConfig},
};

/// Collaborators shared by every processing unit
pub struct ProcessingContext {
	pub rule_source: Arc<dyn RuleSource>,
	pub client: Arc<dyn BlockChainClient>,
	pub sink: Arc<dyn TransactionSink>,
	/// Logs the predicate rejecting each transaction/rule pair
	pub verbose_logging: bool,
}

/// Result of one successful pass of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitReport {
	/// The snapshot is not applicable at this confirmation count; nothing was done
	NotApplicable { maximum_block_delay: u64 },
	/// The block was matched and `matched` candidates were persisted
	Completed { matched: usize },
}

/// Message a unit sends back to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOutcome {
	/// The block was processed; its queue entry can be retired
	Completed { block_number: u64 },
	/// The unit exited without processing
	NotApplicable { block_number: u64 },
	/// The unit failed; the queue entry stays pending
	Failed { block_number: u64 },
	/// The unit failed after all retries and the entry should be dead-lettered
	DeadLettered { block_number: u64 },
}

impl UnitOutcome {
	pub fn block_number(&self) -> u64 {
		match self {
			Self::Completed { block_number }
			| Self::NotApplicable { block_number }
			| Self::Failed { block_number }
			| Self::DeadLettered { block_number } => *block_number,
		}
	}
}

/// Isolated computation for one block at one confirmation count
pub struct BlockProcessingUnit {
	block_number: u64,
	confirmation_count: u64,
	context: Arc<ProcessingContext>,
}

impl BlockProcessingUnit {
	pub fn new(block_number: u64, confirmation_count: u64, context: Arc<ProcessingContext>) -> Self {
		Self {
			block_number,
			confirmation_count,
			context,
		}
	}

	fn metadata(&self) -> HashMap<String, String> {
		HashMap::from([
			("block_number".to_string(), self.block_number.to_string()),
			(
				"confirmation_count".to_string(),
				self.confirmation_count.to_string(),
			),
		])
	}

	/// Runs the unit once.
	///
	/// # Returns
	/// * `Ok(UnitReport)` - The unit either skipped a non-applicable snapshot or
	///   processed the block
	/// * `Err(BlockWatcherError)` - Rule fetch, block fetch or persistence failed
	#[instrument(
		skip(self),
		fields(block = self.block_number, confirmations = self.confirmation_count)
	)]
	pub async fn process(&self) -> Result<UnitReport, BlockWatcherError> {
		let rules = self.context.rule_source.fetch_rules().await.map_err(|e| {
			BlockWatcherError::processing_error(
				"Failed to fetch rules",
				Some(Box::new(e)),
				Some(self.metadata()),
			)
		})?;

		let Some(applicable_rules) = filter_applicable_rules(&rules, self.confirmation_count)
		else {
			let maximum_block_delay = maximum_block_delay(&rules);
			tracing::debug!(
				rules = rules.len(),
				maximum_block_delay,
				"Rule snapshot not applicable"
			);
			return Ok(UnitReport::NotApplicable {
				maximum_block_delay,
			});
		};

		let block = self
			.context
			.client
			.get_block_with_transactions(self.block_number)
			.await
			.map_err(|e| {
				BlockWatcherError::processing_error(
					"Failed to fetch block",
					Some(e.into()),
					Some(self.metadata()),
				)
			})?;

		let candidates = match_transactions(
			block.transactions(),
			applicable_rules,
			self.context.verbose_logging,
		);

		if !candidates.is_empty() {
			self.context.sink.persist(&candidates).await.map_err(|e| {
				BlockWatcherError::processing_error(
					"Failed to persist matched transactions",
					Some(Box::new(e)),
					Some(self.metadata()),
				)
			})?;
		}

		tracing::info!(
			rules = applicable_rules.len(),
			transactions = block.transactions().len(),
			matches = candidates.len(),
			"Processed block"
		);

		Ok(UnitReport::Completed {
			matched: candidates.len(),
		})
	}

	/// Runs the unit, retrying failures according to `retry`, and converts the result
	/// into the outcome reported to the dispatcher.
	///
	/// A failure that survives every retry yields [`UnitOutcome::DeadLettered`] when
	/// `dead_letter` is set and [`UnitOutcome::Failed`] otherwise.
	pub async fn run(&self, retry: &RetryConfig, dead_letter: bool) -> UnitOutcome {
		let block_number = self.block_number;

		let operation = || async { self.process().await };

		let backoff = ExponentialBuilder::default()
			.with_min_delay(retry.initial_backoff)
			.with_max_delay(retry.max_backoff)
			.with_factor(retry.base_for_backoff as f32)
			.with_max_times(retry.max_retries as usize);

		let backoff_with_jitter = match retry.jitter {
			JitterSetting::Full => backoff.with_jitter(),
			JitterSetting::None => backoff,
		};

		let result = operation
			.retry(backoff_with_jitter.build())
			.notify(|e: &BlockWatcherError, delay: Duration| {
				tracing::warn!(
					block = block_number,
					error = %e,
					retry_in_ms = delay.as_millis() as u64,
					"Processing unit failed, retrying"
				);
			})
			.await;

		match result {
			Ok(UnitReport::Completed { .. }) => UnitOutcome::Completed { block_number },
			Ok(UnitReport::NotApplicable { .. }) => UnitOutcome::NotApplicable { block_number },
			Err(e) => {
				tracing::error!(block = block_number, error = %e, "Processing unit failed");
				if dead_letter {
					UnitOutcome::DeadLettered { block_number }
				} else {
					UnitOutcome::Failed { block_number }
				}
			}
		}
	}
}
