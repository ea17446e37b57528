//! Blockchain client implementations.
//!
//! Contains specific implementations for different blockchain types:
//! - EVM client for Ethereum-compatible chains

mod evm {
	pub mod client;
}

pub use evm::client::EvmClient;
