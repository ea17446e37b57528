mod candidate;
mod network;
mod rule;
mod service;

pub use candidate::{BatchInsertRequest, TransactionCandidate};
pub use network::{Network, RpcUrl};
pub use rule::Rule;
pub use service::ServiceConfig;
