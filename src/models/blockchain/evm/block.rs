//! EVM block data structures.

use std::ops::Deref;

use alloy::primitives::{B256, U256, U64};
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Block as returned by `eth_getBlockByNumber` with full transaction objects.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseBlock {
	/// Hash of the block. None if pending.
	#[serde(default)]
	pub hash: Option<B256>,
	/// Hash of the parent
	#[serde(rename = "parentHash", default)]
	pub parent_hash: B256,
	/// Block number. None if pending.
	#[serde(default)]
	pub number: Option<U64>,
	/// Timestamp
	#[serde(default)]
	pub timestamp: U256,
	/// Transactions
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

/// Wrapper around [`BaseBlock`] that implements additional functionality
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(pub BaseBlock);

impl Block {
	/// Get the block number
	pub fn number(&self) -> Option<u64> {
		self.0.number.map(|n| n.to::<u64>())
	}

	/// Get the transactions contained in the block
	pub fn transactions(&self) -> &[Transaction] {
		&self.0.transactions
	}
}

impl From<BaseBlock> for Block {
	fn from(block: BaseBlock) -> Self {
		Self(block)
	}
}

impl Deref for Block {
	type Target = BaseBlock;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
