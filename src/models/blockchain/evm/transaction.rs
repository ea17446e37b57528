//! EVM transaction data structures.

use std::ops::Deref;

use alloy::primitives::{Address, Bytes, B256, U256, U64};
use serde::{Deserialize, Serialize};

/// Transaction object as returned inside `eth_getBlockByNumber(n, true)`.
///
/// Only the fields read by the matcher and the persistence payload are modelled;
/// any other field in the node response is ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct BaseTransaction {
	/// Hash
	pub hash: B256,
	/// Nonce
	pub nonce: U64,
	/// Block number. None when pending.
	#[serde(rename = "blockNumber", default)]
	pub block_number: Option<U64>,
	/// Sender
	pub from: Address,
	/// Recipient (None when contract creation)
	#[serde(default)]
	pub to: Option<Address>,
	/// Transferred value
	pub value: U256,
	/// Gas Price
	#[serde(rename = "gasPrice", default, skip_serializing_if = "Option::is_none")]
	pub gas_price: Option<U256>,
	/// Gas amount
	pub gas: U256,
	/// Input data
	#[serde(default)]
	pub input: Bytes,
	/// Transaction type, None for pre-typed legacy transactions
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub transaction_type: Option<U64>,
	/// Max fee per gas
	#[serde(
		rename = "maxFeePerGas",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub max_fee_per_gas: Option<U256>,
	/// Max priority fee per gas
	#[serde(
		rename = "maxPriorityFeePerGas",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub max_priority_fee_per_gas: Option<U256>,
}

/// Wrapper around [`BaseTransaction`] exposing the values the matcher works with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(pub BaseTransaction);

impl Transaction {
	/// Get the transaction hash
	pub fn hash(&self) -> &B256 {
		&self.0.hash
	}

	/// Get the transaction sender address
	pub fn sender(&self) -> &Address {
		&self.0.from
	}

	/// Get the transaction recipient address (None for contract creation)
	pub fn to(&self) -> Option<&Address> {
		self.0.to.as_ref()
	}

	/// Get the transaction value (amount of ETH transferred)
	pub fn value(&self) -> &U256 {
		&self.0.value
	}

	/// Get the gas limit for the transaction
	pub fn gas(&self) -> &U256 {
		&self.0.gas
	}

	/// Get the gas price (None when the node omits it)
	pub fn gas_price(&self) -> Option<&U256> {
		self.0.gas_price.as_ref()
	}

	/// Get the sender nonce
	pub fn nonce(&self) -> u64 {
		self.0.nonce.to::<u64>()
	}

	/// Get the transaction type, if the node reported one
	pub fn transaction_type(&self) -> Option<u64> {
		self.0.transaction_type.map(|t| t.to::<u64>())
	}
}

impl From<BaseTransaction> for Transaction {
	fn from(tx: BaseTransaction) -> Self {
		Self(tx)
	}
}

impl Deref for Transaction {
	type Target = BaseTransaction;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
