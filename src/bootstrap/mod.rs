//! Bootstrap module for loading configuration and initializing services.
//!
//! # Services
//! - `HttpRuleSource`: Fetches the active rule set
//! - `HttpBatchPersistence`: Submits matched transactions
//! - `EvmClient`: Fetches full blocks over HTTP JSON-RPC
//! - `BlockSubscriber`: WebSocket `newHeads` subscription when a `ws_rpc` URL is
//!   configured, HTTP polling otherwise

use std::{
	error::Error,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};

use reqwest_retry::DefaultRetryableStrategy;

use crate::{
	models::{ConfigError, ConfigLoader, ServiceConfig},
	services::{
		blockchain::{
			BlockChainClient, BlockSubscriber, EvmClient, PollingBlockSubscriber,
			WsTransportClient,
		},
		blockwatcher::ProcessingContext,
		persistence::HttpBatchPersistence,
		rule_source::HttpRuleSource,
	},
	utils::{
		constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH},
		http::{create_base_http_client, create_retryable_http_client},
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;

/// Services produced by [`initialize_services`]
pub struct Services {
	/// Collaborators handed to every processing unit
	pub context: ProcessingContext,
	/// Source of new block numbers
	pub subscriber: Box<dyn BlockSubscriber>,
}

/// Resolves the configuration file path.
///
/// The explicit path wins, then `MONITOR_CONFIG_PATH`, then the default location.
pub fn resolve_config_path<F>(explicit: Option<&str>, lookup: F) -> PathBuf
where
	F: Fn(&str) -> Option<String>,
{
	explicit
		.map(str::to_string)
		.or_else(|| lookup(CONFIG_PATH_ENV).filter(|value| !value.trim().is_empty()))
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads and validates the service configuration.
///
/// When `path` does not exist the configuration is built from environment variables
/// alone. Environment overrides are applied on top of a file configuration as well.
///
/// # Errors
/// Returns a [`ConfigError`] if the file cannot be parsed or the result is invalid.
pub fn load_config<F>(path: &Path, lookup: F) -> std::result::Result<ServiceConfig, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let config = if path.exists() {
		tracing::info!(path = %path.display(), "Loading configuration file");
		let mut config = ServiceConfig::load_from_path(path)?;
		config.apply_overrides(lookup);
		config
	} else {
		tracing::info!(
			path = %path.display(),
			"Configuration file not found, using environment variables"
		);
		ServiceConfig::from_overrides(lookup)
	};

	config.validate()?;
	Ok(config)
}

/// Initializes the rule source, chain client, persistence client and block subscriber.
///
/// # Errors
/// Returns an error if an HTTP client cannot be built or no usable RPC URL exists.
pub fn initialize_services(config: &ServiceConfig) -> Result<Services> {
	let api_client = create_retryable_http_client(
		&config.http_retry,
		create_base_http_client()?,
		Some(DefaultRetryableStrategy),
	);

	let rule_source = HttpRuleSource::new(api_client.clone(), config.api_base_url());
	let sink =
		HttpBatchPersistence::new(api_client, config.api_base_url()).with_batch_size(config.batch_size);
	let client: Arc<dyn BlockChainClient> =
		Arc::new(EvmClient::new(&config.network, &config.http_retry)?);

	let subscriber: Box<dyn BlockSubscriber> =
		match config.network.preferred_rpc_url("ws_rpc") {
			Some(url) => {
				tracing::info!(url, "Subscribing to new heads over WebSocket");
				Box::new(WsTransportClient::new_with_url(url))
			}
			None => {
				let interval = Duration::from_millis(config.network.block_time_ms);
				tracing::info!(
					interval_ms = config.network.block_time_ms,
					"No WebSocket RPC URL configured, polling for new blocks"
				);
				Box::new(PollingBlockSubscriber::new(client.clone(), interval))
			}
		};

	Ok(Services {
		context: ProcessingContext {
			rule_source: Arc::new(rule_source),
			client,
			sink: Arc::new(sink),
			verbose_logging: config.verbose_logging,
		},
		subscriber,
	})
}
