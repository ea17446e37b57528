//! Domain models and data structures for the transaction rule monitor.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `blockchain`: EVM block and transaction models as returned by JSON-RPC
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Rule, TransactionCandidate, Network, ServiceConfig)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::evm::{EVMBaseTransaction, EVMBlock, EVMTransaction};

// Re-export core types
pub use core::{
	BatchInsertRequest, Network, RpcUrl, Rule, ServiceConfig, TransactionCandidate,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
