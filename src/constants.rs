//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Default API base URL when none is configured
pub const DEFAULT_API_DOMAIN: &str = "http://localhost:8000/api/v1";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory under the home directory holding the config file
pub const CONFIG_DIR: &str = ".dq-console";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Log file written in the working directory
pub const LOG_FILE: &str = "dq-console.log";

/// Delay between a successful submit and the modal closing
pub const SUBMIT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// How long a status bar message stays up
pub const FLASH_DURATION: Duration = Duration::from_secs(4);

/// Rows per table page
pub const PAGE_SIZE: usize = 10;

/// Application name
pub const APP_NAME: &str = "DQ Console";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the tracing filter
pub const LOG_FILTER_ENV: &str = "DQ_LOG";

/// Prefix of the environment variables overriding the config file
pub const ENV_PREFIX: &str = "DQ_";
