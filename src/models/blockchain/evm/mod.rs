//! Ethereum Virtual Machine (EVM) blockchain specific implementations.
//!
//! This module contains data structures and implementations specific to EVM-based
//! blockchains, including blocks with full transaction objects.

mod block;
mod transaction;

pub use block::Block as EVMBlock;
pub use transaction::{BaseTransaction as EVMBaseTransaction, Transaction as EVMTransaction};
