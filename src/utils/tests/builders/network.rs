//! Builder for network settings used by client and configuration tests.
//!
//! The default network has a single HTTP endpoint at `https://test.network`.

use crate::models::{Network, RpcUrl};

/// Builds [`Network`] values field by field
pub struct NetworkBuilder {
	network: Network,
}

fn endpoint(type_: &str, url: &str, weight: u32) -> RpcUrl {
	RpcUrl {
		type_: type_.to_string(),
		url: url.to_string(),
		weight,
	}
}

impl Default for NetworkBuilder {
	fn default() -> Self {
		Self {
			network: Network {
				name: "Test Network".to_string(),
				slug: "test_network".to_string(),
				chain_id: Some(1),
				rpc_urls: vec![endpoint("rpc", "https://test.network", 100)],
				block_time_ms: 1000,
			},
		}
	}
}

impl NetworkBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.network.name = name.to_string();
		self
	}

	pub fn slug(mut self, slug: &str) -> Self {
		self.network.slug = slug.to_string();
		self
	}

	/// Replaces every endpoint with a single HTTP endpoint
	pub fn rpc_url(mut self, url: &str) -> Self {
		self.network.rpc_urls = vec![endpoint("rpc", url, 100)];
		self
	}

	pub fn add_rpc_url(mut self, type_: &str, url: &str, weight: u32) -> Self {
		self.network.rpc_urls.push(endpoint(type_, url, weight));
		self
	}

	pub fn clear_rpc_urls(mut self) -> Self {
		self.network.rpc_urls.clear();
		self
	}

	/// Sets the block time, which is also the polling interval
	pub fn block_time_ms(mut self, block_time_ms: u64) -> Self {
		self.network.block_time_ms = block_time_ms;
		self
	}

	pub fn build(self) -> Network {
		self.network
	}
}
