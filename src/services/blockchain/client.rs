//! Core blockchain client interface and traits.
//!
//! The processing pipeline only needs two things from a chain provider: the block
//! numbers of newly produced blocks and the body of a given block with its full
//! transaction objects.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::EVMBlock;

/// Defines the core interface for blockchain clients
#[async_trait]
pub trait BlockChainClient: Send + Sync {
	/// Retrieves the latest block number from the blockchain
	///
	/// # Returns
	/// * `Result<u64, anyhow::Error>` - The latest block number or an error
	async fn get_latest_block_number(&self) -> Result<u64, anyhow::Error>;

	/// Retrieves a block together with its full transaction objects
	///
	/// # Arguments
	/// * `block_number` - The number of the block to fetch
	///
	/// # Returns
	/// * `Result<EVMBlock, anyhow::Error>` - The block or an error, including when the
	///   node does not know the block yet
	async fn get_block_with_transactions(&self, block_number: u64)
		-> Result<EVMBlock, anyhow::Error>;
}

/// Source of new-block notifications
#[async_trait]
pub trait BlockSubscriber: Send + Sync {
	/// Opens a subscription yielding the number of every new block.
	///
	/// The stream ends when the underlying connection is lost.
	async fn subscribe(&self) -> Result<BoxStream<'static, u64>, anyhow::Error>;
}
