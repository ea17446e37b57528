//! EVM-compatible blockchain client implementation.
//!
//! This module provides functionality to interact with Ethereum and other EVM-compatible
//! blockchains over JSON-RPC: the latest block number and blocks with full transactions.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
	models::{EVMBlock, Network},
	services::blockchain::{
		client::BlockChainClient,
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::http::RetryConfig,
};

/// Client implementation for Ethereum Virtual Machine (EVM) compatible blockchains
///
/// Provides high-level access to EVM blockchain data through a JSON-RPC transport.
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	/// The underlying transport client for RPC communication
	http_client: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a new EVM client instance with a specific transport client
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}
}

impl EvmClient<HttpTransportClient> {
	/// Creates a new EVM client instance
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC endpoints and chain details
	/// * `retry_config` - Retry policy for transient HTTP failures
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or configuration error
	pub fn new(network: &Network, retry_config: &RetryConfig) -> Result<Self, BlockChainError> {
		let client = HttpTransportClient::new(network, retry_config)?;
		Ok(Self::new_with_transport(client))
	}
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockChainClient for EvmClient<T> {
	/// Retrieves the latest block number with `eth_blockNumber`
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error> {
		let response = self
			.http_client
			.send_raw_request::<Value>("eth_blockNumber", None)
			.await
			.with_context(|| "Failed to get block number")?;

		let hex_str = response
			.get("result")
			.and_then(|v| v.as_str())
			.ok_or_else(|| anyhow::anyhow!("Missing 'result' field"))?;

		u64::from_str_radix(hex_str.trim_start_matches("0x"), 16)
			.map_err(|e| anyhow::anyhow!("Failed to parse block number: {}", e))
	}

	/// Retrieves a block with full transaction objects with `eth_getBlockByNumber(n, true)`
	#[instrument(skip(self))]
	async fn get_block_with_transactions(
		&self,
		block_number: u64,
	) -> Result<EVMBlock, anyhow::Error> {
		let params = json!([format!("0x{:x}", block_number), true]);

		let response = self
			.http_client
			.send_raw_request("eth_getBlockByNumber", Some(params))
			.await
			.with_context(|| format!("Failed to get block: {}", block_number))?;

		let block_data = response
			.get("result")
			.ok_or_else(|| anyhow::anyhow!("Missing 'result' field"))?;

		if block_data.is_null() {
			return Err(BlockChainError::block_not_found(
				"Block not available from node",
				None,
				Some(HashMap::from([(
					"block_number".to_string(),
					block_number.to_string(),
				)])),
			)
			.into());
		}

		let block: EVMBlock = serde_json::from_value(block_data.clone())
			.with_context(|| format!("Failed to parse block: {}", block_number))?;

		Ok(block)
	}
}
