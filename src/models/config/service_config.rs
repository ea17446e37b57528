//! Service configuration loading and validation.
//!
//! The configuration comes from a JSON file. `API_BASE_URL`, `RPC_URL`, `WS_RPC_URL`
//! and `VERBOSE_LOGGING` override the corresponding file values. When no file is
//! present the configuration can be built from those variables alone.

use std::{collections::HashMap, path::Path};

use crate::{
	models::{ConfigError, ConfigLoader, Network, RpcUrl, ServiceConfig},
	utils::{
		constants::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENT_UNITS},
		RetryConfig,
	},
};

/// Environment variable overriding `api_base_url`
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";
/// Environment variable overriding the HTTP RPC endpoint
pub const RPC_URL_ENV: &str = "RPC_URL";
/// Environment variable overriding the WebSocket RPC endpoint
pub const WS_RPC_URL_ENV: &str = "WS_RPC_URL";
/// Environment variable overriding `verbose_logging`
pub const VERBOSE_LOGGING_ENV: &str = "VERBOSE_LOGGING";

const MAX_BATCH_SIZE: usize = 100;

impl ServiceConfig {
	/// Builds a configuration for Ethereum mainnet from environment-style lookups only.
	///
	/// The result still has to pass [`ConfigLoader::validate`]; in particular the API
	/// base URL and at least one RPC URL must be provided by `lookup`.
	pub fn from_overrides<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut config = Self {
			network: Network {
				slug: "ethereum_mainnet".to_string(),
				name: "Ethereum Mainnet".to_string(),
				chain_id: Some(1),
				rpc_urls: Vec::new(),
				block_time_ms: 12000,
			},
			api_base_url: String::new(),
			verbose_logging: false,
			max_concurrent_units: DEFAULT_MAX_CONCURRENT_UNITS,
			batch_size: DEFAULT_BATCH_SIZE,
			unit_retry: RetryConfig::default(),
			dead_letter: false,
			http_retry: RetryConfig::default(),
		};
		config.apply_overrides(lookup);
		config
	}

	/// Applies overrides from the process environment.
	pub fn apply_env_overrides(&mut self) {
		self.apply_overrides(|key| std::env::var(key).ok());
	}

	/// Applies overrides resolved through `lookup`.
	///
	/// An RPC override replaces every configured URL of the same type.
	pub fn apply_overrides<F>(&mut self, lookup: F)
	where
		F: Fn(&str) -> Option<String>,
	{
		let resolve = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

		if let Some(api_base_url) = resolve(API_BASE_URL_ENV) {
			self.api_base_url = api_base_url;
		}

		for (key, type_) in [(RPC_URL_ENV, "rpc"), (WS_RPC_URL_ENV, "ws_rpc")] {
			if let Some(url) = resolve(key) {
				self.network.rpc_urls.retain(|rpc_url| rpc_url.type_ != type_);
				self.network.rpc_urls.push(RpcUrl {
					type_: type_.to_string(),
					url,
					weight: 100,
				});
			}
		}

		if let Some(verbose) = resolve(VERBOSE_LOGGING_ENV) {
			self.verbose_logging = matches!(
				verbose.trim().to_lowercase().as_str(),
				"1" | "true" | "yes" | "on"
			);
		}
	}

	/// Base URL of the management API without a trailing slash.
	pub fn api_base_url(&self) -> &str {
		self.api_base_url.trim_end_matches('/')
	}
}

impl ConfigLoader for ServiceConfig {
	/// Load the service configuration from a specific file
	///
	/// The file is parsed but not validated, so that overrides can be applied first.
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"configuration file must be a JSON file",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse config: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})
	}

	/// Validate the service configuration
	fn validate(&self) -> Result<(), ConfigError> {
		self.network.validate()?;

		let api_url = url::Url::parse(self.api_base_url()).map_err(|e| {
			ConfigError::validation_error(
				format!("Invalid API base URL: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"api_base_url".to_string(),
					self.api_base_url.clone(),
				)])),
			)
		})?;
		if !matches!(api_url.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(
				"API base URL must start with http:// or https://",
				None,
				None,
			));
		}

		if self.max_concurrent_units == 0 {
			return Err(ConfigError::validation_error(
				"max_concurrent_units must be greater than 0",
				None,
				None,
			));
		}

		if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
			return Err(ConfigError::validation_error(
				format!("batch_size must be between 1 and {}", MAX_BATCH_SIZE),
				None,
				None,
			));
		}

		if self.dead_letter && self.unit_retry.max_retries == 0 {
			tracing::warn!("dead_letter is enabled but unit_retry.max_retries is 0");
		}

		Ok(())
	}
}
