//! Blockchain client interfaces and implementations.
//!
//! Provides abstractions and concrete implementations for reading an EVM chain:
//!
//! - Generic blockchain client and block subscription traits
//! - EVM client over JSON-RPC
//! - HTTP and WebSocket transports
//! - Error handling for blockchain operations

mod client;
mod clients;
mod error;
mod subscription;
mod transports;

pub use client::{BlockChainClient, BlockSubscriber};
pub use clients::EvmClient;
pub use error::BlockChainError;
pub use subscription::PollingBlockSubscriber;
pub use transports::{BlockchainTransport, HttpTransportClient, WsTransportClient};
