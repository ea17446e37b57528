//! Errors of chain access: connectivity, malformed JSON-RPC exchanges and blocks
//! the node does not know.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;

/// Failure of a JSON-RPC call or of the block subscription
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The endpoint could not be reached or the socket failed
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Non-2xx status, JSON-RPC error object or unreadable response
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// `eth_getBlockByNumber` returned null
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	/// The request could not be built locally
	#[error("Internal error: {0}")]
	InternalError(ErrorContext),
}

impl BlockChainError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(ErrorContext::new_with_log(msg, source, metadata))
	}

	fn context(&self) -> &ErrorContext {
		match self {
			Self::ConnectionError(ctx)
			| Self::RequestError(ctx)
			| Self::BlockNotFound(ctx)
			| Self::InternalError(ctx) => ctx,
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
