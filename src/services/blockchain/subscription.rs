//! Block subscription over HTTP polling.
//!
//! Polls `eth_blockNumber` every block time and emits every block number above the
//! last one observed, so that a poll covering several new blocks does not skip any.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::time::MissedTickBehavior;

use crate::services::blockchain::{BlockChainClient, BlockSubscriber};

/// Turns a [`BlockChainClient`] into a [`BlockSubscriber`] by polling the chain head.
#[derive(Clone)]
pub struct PollingBlockSubscriber {
	client: Arc<dyn BlockChainClient>,
	interval: Duration,
}

impl PollingBlockSubscriber {
	pub fn new(client: Arc<dyn BlockChainClient>, interval: Duration) -> Self {
		Self { client, interval }
	}
}

struct PollState {
	client: Arc<dyn BlockChainClient>,
	ticker: tokio::time::Interval,
	last_seen: Option<u64>,
	pending: VecDeque<u64>,
}

#[async_trait]
impl BlockSubscriber for PollingBlockSubscriber {
	async fn subscribe(&self) -> Result<BoxStream<'static, u64>, anyhow::Error> {
		let mut ticker = tokio::time::interval(self.interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		let state = PollState {
			client: self.client.clone(),
			ticker,
			last_seen: None,
			pending: VecDeque::new(),
		};

		let stream = stream::unfold(state, |mut state| async move {
			loop {
				if let Some(block_number) = state.pending.pop_front() {
					return Some((block_number, state));
				}

				state.ticker.tick().await;

				let latest = match state.client.get_latest_block_number().await {
					Ok(latest) => latest,
					Err(e) => {
						tracing::warn!(error = %e, "Failed to poll latest block number");
						continue;
					}
				};

				match state.last_seen {
					// The first poll only establishes the chain head.
					None => state.pending.push_back(latest),
					Some(last_seen) if latest > last_seen => {
						state.pending.extend(last_seen + 1..=latest);
					}
					Some(_) => {}
				}
				if state.last_seen.is_none_or(|last_seen| latest > last_seen) {
					state.last_seen = Some(latest);
				}
			}
		});

		Ok(stream.boxed())
	}
}
