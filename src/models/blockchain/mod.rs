//! Blockchain-specific model implementations.
//!
//! Only EVM chains are monitored, so this module currently holds a single platform.

pub mod evm;
