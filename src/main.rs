//! Transaction rule monitor entry point.
//!
//! This binary loads the service configuration, wires up the rule source, the chain
//! client and the persistence client, then runs the block monitor until the block
//! subscription ends or an interrupt signal is received.
//!
//! # Flow
//! 1. Loads `.env`, applies CLI logging options and sets up logging
//! 2. Loads and validates the configuration (file, then environment overrides)
//! 3. Subscribes to new blocks and dispatches one processing unit per block
//! 4. Handles graceful shutdown on Ctrl+C

use tx_rule_monitor::{
	bootstrap::{initialize_services, load_config, resolve_config_path, Result},
	services::blockwatcher::{BlockMonitor, MonitorSettings},
	utils::logging::setup_logging,
};

use clap::{Arg, Command};
use dotenvy::dotenv;
use std::env::{set_var, var};
use tokio::sync::watch;
use tracing::{error, info};

/// Main entry point for the transaction rule monitor.
///
/// # Errors
/// Returns an error if the configuration is invalid, a service cannot be initialized
/// or the block subscription cannot be established.
#[tokio::main]
async fn main() -> Result<()> {
	let matches = Command::new("tx-rule-monitor")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Watches an EVM chain for new blocks, matches confirmed transactions against \
			 rules fetched from an API and submits the matches in batches.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the JSON configuration file (default: config/monitor.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("RUST_LOG").is_err() {
			set_var("RUST_LOG", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config_path = resolve_config_path(
		matches.get_one::<String>("config").map(String::as_str),
		|key| var(key).ok(),
	);
	let config = load_config(&config_path, |key| var(key).ok())?;

	info!(
		network = %config.network.slug,
		api = %config.api_base_url(),
		max_concurrent_units = config.max_concurrent_units,
		batch_size = config.batch_size,
		"Configuration loaded"
	);

	let services = initialize_services(&config)?;
	let monitor = BlockMonitor::new(services.context, MonitorSettings::from(&config));

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	tokio::spawn(async move {
		if let Err(e) = tokio::signal::ctrl_c().await {
			error!("Error waiting for Ctrl+C: {}", e);
			return;
		}
		info!("Shutdown signal received, stopping services...");
		let _ = shutdown_tx.send(true);
	});

	info!("Service started. Press Ctrl+C to shutdown");

	let snapshot = monitor.start(services.subscriber.as_ref(), shutdown_rx).await?;

	info!(
		pending = ?snapshot.pending,
		dead_letters = ?snapshot.dead_letters,
		"Block monitor stopped"
	);

	Ok(())
}
