//! Network transport implementations for blockchain clients.
//!
//! - HTTP JSON-RPC transport for requests
//! - WebSocket transport for `newHeads` subscriptions

mod http;
mod ws;

pub use http::HttpTransportClient;
pub use ws::WsTransportClient;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::services::blockchain::BlockChainError;

/// Base trait for all blockchain transport clients
#[async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Get the URL being used by the transport
	fn get_current_url(&self) -> &str;

	/// Send a raw JSON-RPC request and return the full response object
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, BlockChainError>
	where
		P: Into<Value> + Send + Clone + Serialize;
}
