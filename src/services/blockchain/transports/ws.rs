//! WebSocket transport for new-block subscriptions.
//!
//! Opens an `eth_subscribe("newHeads")` subscription on the highest-weighted
//! `ws_rpc` endpoint and turns the notifications into a stream of block numbers.

use async_trait::async_trait;
use futures::{future, stream::BoxStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::{collections::HashMap, time::Duration};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::services::blockchain::{BlockChainError, BlockSubscriber};

const SUBSCRIBE_REQUEST_ID: u64 = 1;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// WebSocket transport client used for block subscriptions
#[derive(Clone, Debug)]
pub struct WsTransportClient {
	url: String,
}

impl WsTransportClient {
	/// Creates a client for a `ws_rpc` endpoint
	pub fn new_with_url(url: &str) -> Self {
		Self {
			url: url.to_string(),
		}
	}

	/// Subscribes to `newHeads` and returns the stream of notified block numbers.
	///
	/// The stream ends when the server closes the connection or a read fails.
	pub async fn subscribe_new_heads(&self) -> Result<BoxStream<'static, u64>, BlockChainError> {
		let metadata = || HashMap::from([("url".to_string(), self.url.clone())]);

		let (mut socket, _) = timeout(CONNECTION_TIMEOUT, connect_async(self.url.as_str()))
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					"WebSocket connection timed out",
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?
			.map_err(|e| {
				BlockChainError::connection_error(
					format!("Failed to connect: {}", e),
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let request = json!({
			"jsonrpc": "2.0",
			"id": SUBSCRIBE_REQUEST_ID,
			"method": "eth_subscribe",
			"params": ["newHeads"]
		});
		socket
			.send(Message::text(request.to_string()))
			.await
			.map_err(|e| {
				BlockChainError::connection_error(
					"Failed to send subscription request",
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let subscription_id = timeout(CONNECTION_TIMEOUT, async {
			while let Some(message) = socket.next().await {
				let text = match message {
					Ok(Message::Text(text)) => text,
					Ok(Message::Close(_)) => break,
					Ok(_) => continue,
					Err(e) => {
						return Err(BlockChainError::connection_error(
							"Failed to read subscription response",
							Some(Box::new(e)),
							Some(metadata()),
						))
					}
				};
				let response: Value = match serde_json::from_str(text.as_str()) {
					Ok(response) => response,
					Err(_) => continue,
				};
				if response.get("id").and_then(Value::as_u64) != Some(SUBSCRIBE_REQUEST_ID) {
					continue;
				}
				if let Some(error) = response.get("error") {
					return Err(BlockChainError::request_error(
						format!("Subscription rejected: {}", error),
						None,
						Some(metadata()),
					));
				}
				return response
					.get("result")
					.and_then(Value::as_str)
					.map(str::to_string)
					.ok_or_else(|| {
						BlockChainError::request_error(
							"Subscription response has no id",
							None,
							Some(metadata()),
						)
					});
			}
			Err(BlockChainError::connection_error(
				"Connection closed before the subscription was confirmed",
				None,
				Some(metadata()),
			))
		})
		.await
		.map_err(|e| {
			BlockChainError::connection_error(
				"Subscription confirmation timed out",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})??;

		tracing::info!(url = %self.url, subscription = %subscription_id, "Subscribed to new heads");

		let url = self.url.clone();
		let stream = socket
			.take_while(move |message| {
				let open = match message {
					Ok(Message::Close(_)) => false,
					Ok(_) => true,
					Err(e) => {
						tracing::warn!(url = %url, error = %e, "WebSocket subscription failed");
						false
					}
				};
				future::ready(open)
			})
			.filter_map(move |message| {
				let block_number = match message {
					Ok(Message::Text(text)) => parse_new_head(text.as_str(), &subscription_id),
					_ => None,
				};
				future::ready(block_number)
			});

		Ok(stream.boxed())
	}
}

#[async_trait]
impl BlockSubscriber for WsTransportClient {
	async fn subscribe(&self) -> Result<BoxStream<'static, u64>, anyhow::Error> {
		Ok(self.subscribe_new_heads().await?)
	}
}

/// Extracts the block number from an `eth_subscription` notification of `subscription_id`.
fn parse_new_head(text: &str, subscription_id: &str) -> Option<u64> {
	let notification: Value = serde_json::from_str(text).ok()?;
	if notification.get("method").and_then(Value::as_str) != Some("eth_subscription") {
		return None;
	}
	let params = notification.get("params")?;
	if params.get("subscription").and_then(Value::as_str) != Some(subscription_id) {
		return None;
	}
	let number = params.get("result")?.get("number")?.as_str()?;
	u64::from_str_radix(number.trim_start_matches("0x"), 16).ok()
}
