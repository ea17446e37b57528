//! Test helper utilities for the service configuration
//!
//! - `ServiceConfigBuilder`: Builder for creating test ServiceConfig instances

use crate::{
	models::{Network, ServiceConfig},
	utils::{
		constants::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENT_UNITS},
		tests::builders::network::NetworkBuilder,
		RetryConfig,
	},
};

/// Builder for creating test ServiceConfig instances
pub struct ServiceConfigBuilder {
	config: ServiceConfig,
}

impl Default for ServiceConfigBuilder {
	fn default() -> Self {
		Self {
			config: ServiceConfig {
				network: NetworkBuilder::new().build(),
				api_base_url: "http://localhost:3000".to_string(),
				verbose_logging: false,
				max_concurrent_units: DEFAULT_MAX_CONCURRENT_UNITS,
				batch_size: DEFAULT_BATCH_SIZE,
				unit_retry: RetryConfig::default(),
				dead_letter: false,
				http_retry: RetryConfig::default(),
			},
		}
	}
}

impl ServiceConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn network(mut self, network: Network) -> Self {
		self.config.network = network;
		self
	}

	pub fn api_base_url(mut self, url: &str) -> Self {
		self.config.api_base_url = url.to_string();
		self
	}

	pub fn verbose_logging(mut self, verbose: bool) -> Self {
		self.config.verbose_logging = verbose;
		self
	}

	pub fn max_concurrent_units(mut self, max: usize) -> Self {
		self.config.max_concurrent_units = max;
		self
	}

	pub fn batch_size(mut self, batch_size: usize) -> Self {
		self.config.batch_size = batch_size;
		self
	}

	pub fn unit_retry(mut self, retry: RetryConfig) -> Self {
		self.config.unit_retry = retry;
		self
	}

	pub fn dead_letter(mut self, dead_letter: bool) -> Self {
		self.config.dead_letter = dead_letter;
		self
	}

	pub fn http_retry(mut self, retry: RetryConfig) -> Self {
		self.config.http_retry = retry;
		self
	}

	pub fn build(self) -> ServiceConfig {
		self.config
	}
}
