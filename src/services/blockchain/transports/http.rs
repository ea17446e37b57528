//! HTTP transport implementation for blockchain interactions.
//!
//! Sends JSON-RPC 2.0 requests to the highest-weighted `rpc` endpoint of the network
//! through a retryable HTTP client.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use reqwest_retry::DefaultRetryableStrategy;
use serde::Serialize;
use serde_json::{json, Value};
use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
};
use url::Url;

use crate::{
	models::Network,
	services::blockchain::{transports::BlockchainTransport, BlockChainError},
	utils::http::{create_base_http_client, create_retryable_http_client, RetryConfig},
};

/// Basic HTTP transport client for blockchain interactions
///
/// The client is thread-safe and can be shared across multiple tasks.
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Retryable HTTP client for making requests
	client: ClientWithMiddleware,
	/// The RPC endpoint
	url: Url,
	/// Counter for generating unique request IDs
	request_id_counter: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Creates a new HTTP transport client for the preferred `rpc` endpoint of a network
	///
	/// # Arguments
	/// * `network` - Network configuration containing RPC URLs and weights
	/// * `retry_config` - Retry policy applied to transient HTTP failures
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - New client instance or configuration error
	pub fn new(network: &Network, retry_config: &RetryConfig) -> Result<Self, BlockChainError> {
		let rpc_url = network.preferred_rpc_url("rpc").ok_or_else(|| {
			BlockChainError::connection_error(
				"No HTTP RPC URL configured",
				None,
				Some(HashMap::from([("network".to_string(), network.slug.clone())])),
			)
		})?;

		Self::new_with_url(rpc_url, retry_config)
	}

	/// Creates a new HTTP transport client for an explicit endpoint
	pub fn new_with_url(url: &str, retry_config: &RetryConfig) -> Result<Self, BlockChainError> {
		let url = Url::parse(url).map_err(|e| {
			BlockChainError::connection_error(
				format!("Invalid RPC URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([("url".to_string(), url.to_string())])),
			)
		})?;

		let base_client = create_base_http_client().map_err(|e| {
			BlockChainError::internal_error(
				"Failed to create base HTTP client",
				Some(Box::new(e)),
				None,
			)
		})?;

		let client = create_retryable_http_client(
			retry_config,
			base_client,
			Some(DefaultRetryableStrategy),
		);

		Ok(Self {
			client,
			url,
			request_id_counter: Arc::new(AtomicU64::new(1)),
		})
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	fn get_current_url(&self) -> &str {
		self.url.as_str()
	}

	/// Sends a JSON-RPC request to the blockchain node
	///
	/// Non-2xx statuses, undecodable bodies and JSON-RPC `error` objects are all
	/// reported as request errors.
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let request_id = self.request_id_counter.fetch_add(1, Ordering::SeqCst);
		let request_body = json!({
			"jsonrpc": "2.0",
			"id": request_id,
			"method": method,
			"params": params.map(|p| p.into())
		});
		let metadata = || {
			HashMap::from([
				("method".to_string(), method.to_string()),
				("url".to_string(), self.url.to_string()),
			])
		};

		let response = self
			.client
			.post(self.url.clone())
			.json(&request_body)
			.send()
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					format!("Failed to send {} request", method),
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(BlockChainError::request_error(
				format!("HTTP error {}: {}", status, body),
				None,
				Some(metadata()),
			));
		}

		let json: Value = response.json().await.map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse JSON-RPC response",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		if let Some(error) = json.get("error") {
			return Err(BlockChainError::request_error(
				format!("JSON-RPC error: {}", error),
				None,
				Some(metadata()),
			));
		}

		Ok(json)
	}
}
