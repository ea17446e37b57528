//! HTTP client for the rule listing endpoint.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;

use crate::{
	models::Rule,
	services::rule_source::RuleSourceError,
	utils::constants::RULES_ENDPOINT,
};

/// Provides the current rule snapshot
#[async_trait]
pub trait RuleSource: Send + Sync {
	/// Fetches the full set of active rules.
	///
	/// Rules flagged inactive are dropped from the returned snapshot.
	async fn fetch_rules(&self) -> Result<Vec<Rule>, RuleSourceError>;
}

/// Rule source backed by `GET {api_base_url}/rules`
#[derive(Clone, Debug)]
pub struct HttpRuleSource {
	client: ClientWithMiddleware,
	url: String,
}

impl HttpRuleSource {
	/// Creates a rule source for the management API at `api_base_url`
	pub fn new(client: ClientWithMiddleware, api_base_url: &str) -> Self {
		Self {
			client,
			url: format!("{}{}", api_base_url.trim_end_matches('/'), RULES_ENDPOINT),
		}
	}
}

#[async_trait]
impl RuleSource for HttpRuleSource {
	async fn fetch_rules(&self) -> Result<Vec<Rule>, RuleSourceError> {
		let metadata = || HashMap::from([("url".to_string(), self.url.clone())]);

		let response = self.client.get(&self.url).send().await.map_err(|e| {
			RuleSourceError::connection_error(
				"Failed to fetch rules",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		let status = response.status();
		if !status.is_success() {
			let mut metadata = metadata();
			metadata.insert("status".to_string(), status.as_u16().to_string());
			return Err(RuleSourceError::response_error(
				format!("Rule listing failed with status {}", status),
				None,
				Some(metadata),
			));
		}

		let body = response.bytes().await.map_err(|e| {
			RuleSourceError::connection_error(
				"Failed to read rule listing",
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		let rules: Vec<Rule> = serde_json::from_slice(&body).map_err(|e| {
			RuleSourceError::parse_error(
				format!("Invalid rule listing: {}", e),
				Some(Box::new(e)),
				Some(metadata()),
			)
		})?;

		let total = rules.len();
		let active: Vec<Rule> = rules.into_iter().filter(|rule| rule.is_active).collect();
		tracing::debug!(total, active = active.len(), "Fetched rules");

		Ok(active)
	}
}
