//! Batch persistence service.
//!
//! Submits matched transactions to the transaction-management API in chunks.

mod client;
mod error;

pub use client::{HttpBatchPersistence, TransactionSink};
pub use error::PersistenceError;
