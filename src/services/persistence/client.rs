//! HTTP client for the batch insert endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest_middleware::ClientWithMiddleware;

use crate::{
	models::{BatchInsertRequest, TransactionCandidate},
	services::persistence::PersistenceError,
	utils::constants::{DEFAULT_BATCH_SIZE, TRANSACTIONS_BATCH_ENDPOINT},
};

/// Destination of matched transactions
#[async_trait]
pub trait TransactionSink: Send + Sync {
	/// Persists every candidate.
	///
	/// Resolves once all submissions succeed and fails if any of them fails. There is
	/// no rollback of submissions that already succeeded.
	async fn persist(&self, candidates: &[TransactionCandidate]) -> Result<(), PersistenceError>;
}

/// Sink backed by `POST {api_base_url}/transactions/batch`
///
/// Candidates are split into chunks of `batch_size`, one request per chunk, all
/// requests in flight at the same time.
#[derive(Clone, Debug)]
pub struct HttpBatchPersistence {
	client: ClientWithMiddleware,
	url: String,
	batch_size: usize,
}

impl HttpBatchPersistence {
	pub fn new(client: ClientWithMiddleware, api_base_url: &str) -> Self {
		Self {
			client,
			url: format!(
				"{}{}",
				api_base_url.trim_end_matches('/'),
				TRANSACTIONS_BATCH_ENDPOINT
			),
			batch_size: DEFAULT_BATCH_SIZE,
		}
	}

	/// Overrides the number of candidates per request. Zero is treated as one.
	pub fn with_batch_size(mut self, batch_size: usize) -> Self {
		self.batch_size = batch_size.max(1);
		self
	}

	async fn submit_chunk(
		&self,
		index: usize,
		chunk: &[TransactionCandidate],
	) -> Result<(), PersistenceError> {
		let metadata = || {
			HashMap::from([
				("url".to_string(), self.url.clone()),
				("chunk".to_string(), index.to_string()),
				("size".to_string(), chunk.len().to_string()),
			])
		};

		let response = self
			.client
			.post(&self.url)
			.json(&BatchInsertRequest {
				transactions: chunk,
			})
			.send()
			.await
			.map_err(|e| {
				PersistenceError::connection_error(
					"Failed to submit transaction batch",
					Some(Box::new(e)),
					Some(metadata()),
				)
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			let mut metadata = metadata();
			metadata.insert("status".to_string(), status.as_u16().to_string());
			return Err(PersistenceError::batch_rejected(
				format!("Batch insert failed with status {}: {}", status, body),
				None,
				Some(metadata),
			));
		}

		Ok(())
	}
}

#[async_trait]
impl TransactionSink for HttpBatchPersistence {
	async fn persist(&self, candidates: &[TransactionCandidate]) -> Result<(), PersistenceError> {
		if candidates.is_empty() {
			return Ok(());
		}

		let submissions = candidates
			.chunks(self.batch_size)
			.enumerate()
			.map(|(index, chunk)| self.submit_chunk(index, chunk));

		let chunks = try_join_all(submissions).await?.len();
		tracing::debug!(
			candidates = candidates.len(),
			chunks,
			"Persisted matched transactions"
		);

		Ok(())
	}
}
