//! Transaction rule monitor.
//!
//! Watches an EVM chain for new blocks, waits until each block has gathered the
//! confirmations required by the active rule set, matches its transactions against
//! the rules and submits the matches to an HTTP API in batches.
//!
//! # Module Structure
//!
//! - `bootstrap`: Loads configuration and wires the services together
//! - `models`: Data structures for configuration, rules and blockchain data
//! - `services`: Core business logic and blockchain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
