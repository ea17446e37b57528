//! Mock implementations of the API-facing services.

use async_trait::async_trait;
use mockall::mock;
use tx_rule_monitor::{
	models::{Rule, TransactionCandidate},
	services::{
		persistence::{PersistenceError, TransactionSink},
		rule_source::{RuleSource, RuleSourceError},
	},
};

mock! {
	/// Mock implementation of the rule source.
	pub RuleSourceTrait {}

	#[async_trait]
	impl RuleSource for RuleSourceTrait {
		async fn fetch_rules(&self) -> Result<Vec<Rule>, RuleSourceError>;
	}
}

mock! {
	/// Mock implementation of the persistence sink.
	pub TransactionSinkTrait {}

	#[async_trait]
	impl TransactionSink for TransactionSinkTrait {
		async fn persist(&self, candidates: &[TransactionCandidate]) -> Result<(), PersistenceError>;
	}
}
