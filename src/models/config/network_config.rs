//! Network configuration validation.

use crate::models::{ConfigError, Network};

const SUPPORTED_RPC_TYPES: [&str; 2] = ["rpc", "ws_rpc"];

impl Network {
	/// Validate the network configuration
	///
	/// Ensures that:
	/// - The network has a valid name and slug
	/// - At least one RPC URL is specified, with a scheme matching its type
	/// - Block time is reasonable
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Network name is required",
				None,
				None,
			));
		}

		if self.slug.is_empty()
			|| !self
				.slug
				.chars()
				.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(ConfigError::validation_error(
				"Slug must contain only lowercase letters, numbers, and underscores",
				None,
				None,
			));
		}

		if !self.rpc_urls.iter().any(|rpc_url| rpc_url.type_ == "rpc") {
			return Err(ConfigError::validation_error(
				"At least one RPC URL of type rpc is required",
				None,
				None,
			));
		}

		if !self
			.rpc_urls
			.iter()
			.all(|rpc_url| SUPPORTED_RPC_TYPES.contains(&rpc_url.type_.as_str()))
		{
			return Err(ConfigError::validation_error(
				format!(
					"RPC URL type must be one of: {}",
					SUPPORTED_RPC_TYPES.join(", ")
				),
				None,
				None,
			));
		}

		for rpc_url in &self.rpc_urls {
			let schemes: &[&str] = if rpc_url.type_ == "ws_rpc" {
				&["ws://", "wss://"]
			} else {
				&["http://", "https://"]
			};
			if !schemes.iter().any(|scheme| rpc_url.url.starts_with(scheme)) {
				return Err(ConfigError::validation_error(
					format!(
						"RPC URLs of type {} must start with {}",
						rpc_url.type_,
						schemes.join(" or ")
					),
					None,
					None,
				));
			}
		}

		if !self.rpc_urls.iter().all(|rpc_url| rpc_url.weight <= 100) {
			return Err(ConfigError::validation_error(
				"All RPC URL weights must be between 0 and 100",
				None,
				None,
			));
		}

		if self.block_time_ms < 100 {
			return Err(ConfigError::validation_error(
				"Block time must be at least 100ms",
				None,
				None,
			));
		}

		self.validate_protocol();

		Ok(())
	}

	/// Logs a warning for every RPC URL using an insecure protocol
	fn validate_protocol(&self) {
		for rpc_url in &self.rpc_urls {
			if rpc_url.url.starts_with("http://") || rpc_url.url.starts_with("ws://") {
				tracing::warn!(
					"Network '{}' uses an insecure RPC URL: {}",
					self.slug,
					rpc_url.url
				);
			}
		}
	}
}
