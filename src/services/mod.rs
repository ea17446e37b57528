//! Core services implementing the monitor's business logic.
//!
//! - `blockchain`: JSON-RPC access to the chain and new-block subscriptions
//! - `blockwatcher`: pending-block queue, dispatcher and processing units
//! - `filter`: rule applicability and transaction matching
//! - `persistence`: batched submission of matched transactions
//! - `rule_source`: retrieval of the active rule set

pub mod blockchain;
pub mod blockwatcher;
pub mod filter;
pub mod persistence;
pub mod rule_source;
