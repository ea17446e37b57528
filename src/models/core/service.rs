use serde::{Deserialize, Serialize};

use crate::{
	models::Network,
	utils::{constants::DEFAULT_BATCH_SIZE, constants::DEFAULT_MAX_CONCURRENT_UNITS, RetryConfig},
};

/// Top-level configuration of the monitor process.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServiceConfig {
	pub network: Network,

	/// Base URL of the rule and transaction management API
	pub api_base_url: String,

	/// Logs the predicate that rejected each transaction/rule pair
	#[serde(default)]
	pub verbose_logging: bool,

	#[serde(default = "default_max_concurrent_units")]
	pub max_concurrent_units: usize,

	/// Number of candidates per `POST /transactions/batch` request
	#[serde(default = "default_batch_size")]
	pub batch_size: usize,

	/// Retry policy for failed processing units (no retries by default)
	#[serde(default)]
	pub unit_retry: RetryConfig,

	/// Moves a block whose unit exhausted its retries out of the pending queue
	#[serde(default)]
	pub dead_letter: bool,

	/// Transport-level retry policy of the API and RPC HTTP clients
	#[serde(default)]
	pub http_retry: RetryConfig,
}

fn default_max_concurrent_units() -> usize {
	DEFAULT_MAX_CONCURRENT_UNITS
}

fn default_batch_size() -> usize {
	DEFAULT_BATCH_SIZE
}
