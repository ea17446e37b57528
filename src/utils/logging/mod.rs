//! Logging setup for the monitor.
//!
//! Reads its configuration from environment variables:
//! - LOG_MODE: "stdout" (default) or "file"
//! - RUST_LOG: filter directives; default is "info"
//! - LOG_DATA_DIR: directory for log files; default is "logs/"
//!
//! File mode writes daily rolling files named `monitor.log.YYYY-MM-DD` without ANSI colors.

pub mod error;

use std::{env, fs::create_dir_all, path::Path};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default directory for log files when `LOG_DATA_DIR` is unset
pub const DEFAULT_LOG_DIR: &str = "logs/";

/// File name prefix used by the rolling file appender
const LOG_FILE_PREFIX: &str = "monitor.log";

fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

fn env_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Sets up logging to stdout, or to a rolling file when `LOG_MODE=file`.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());

	if log_mode.eq_ignore_ascii_case("file") {
		let log_dir = env::var("LOG_DATA_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
		create_dir_all(Path::new(&log_dir))?;

		let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);

		tracing_subscriber::registry()
			.with(env_filter())
			.with(
				fmt::layer()
					.with_writer(file_appender)
					.event_format(create_log_format(false))
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.try_init()?;

		tracing::info!(directory = %log_dir, "Logging to file");
		return Ok(());
	}

	setup_logging_with_writer(std::io::stdout)
}

/// Sets up logging with a custom writer
pub fn setup_logging_with_writer<W>(
	writer: W,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(env_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(create_log_format(true))
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
