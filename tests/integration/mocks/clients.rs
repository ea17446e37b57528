//! Mock implementations of blockchain clients.
//!
//! - [`MockBlockChainClientTrait`] - Mock implementation of the chain client
//! - [`MockBlockSubscriberTrait`] - Mock implementation of the new-block subscription

use async_trait::async_trait;
use futures::stream::BoxStream;
use mockall::mock;
use tx_rule_monitor::{
	models::EVMBlock,
	services::blockchain::{BlockChainClient, BlockSubscriber},
};

mock! {
	/// Mock implementation of the chain client trait.
	///
	/// Simulates block responses without actual network calls.
	pub BlockChainClientTrait {}

	#[async_trait]
	impl BlockChainClient for BlockChainClientTrait {
		async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;
		async fn get_block_with_transactions(
			&self,
			block_number: u64,
		) -> Result<EVMBlock, anyhow::Error>;
	}
}

mock! {
	/// Mock implementation of the new-block subscription.
	pub BlockSubscriberTrait {}

	#[async_trait]
	impl BlockSubscriber for BlockSubscriberTrait {
		async fn subscribe(&self) -> Result<BoxStream<'static, u64>, anyhow::Error>;
	}
}
