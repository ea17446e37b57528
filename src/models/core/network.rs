use serde::{Deserialize, Serialize};

/// RPC endpoint of a network. `type_` is `rpc` for HTTP or `ws_rpc` for WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RpcUrl {
	pub type_: String,
	pub url: String,
	#[serde(default = "default_weight")]
	pub weight: u32,
}

fn default_weight() -> u32 {
	100
}

/// The EVM network whose blocks are ingested.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Network {
	pub slug: String,
	pub name: String,
	#[serde(default)]
	pub chain_id: Option<u64>,
	pub rpc_urls: Vec<RpcUrl>,
	/// Average block time, used as the polling interval of HTTP subscriptions
	pub block_time_ms: u64,
}

impl Network {
	/// Returns the highest-weighted URL of the given type, if any.
	pub fn preferred_rpc_url(&self, type_: &str) -> Option<&str> {
		self.rpc_urls
			.iter()
			.filter(|rpc_url| rpc_url.type_ == type_)
			.max_by_key(|rpc_url| rpc_url.weight)
			.map(|rpc_url| rpc_url.url.as_str())
	}
}
