//! Constants shared across the crate.

/// Path of the rule listing endpoint on the management API
pub const RULES_ENDPOINT: &str = "/rules";

/// Path of the batch insert endpoint on the management API
pub const TRANSACTIONS_BATCH_ENDPOINT: &str = "/transactions/batch";

/// Number of transactions submitted per batch request
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default cap on processing units running at the same time
pub const DEFAULT_MAX_CONCURRENT_UNITS: usize = 16;

/// Default path of the service configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/monitor.json";

/// Environment variable pointing at the service configuration file
pub const CONFIG_PATH_ENV: &str = "MONITOR_CONFIG_PATH";
