//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "market=info,warn";
pub const LOG_FILE_NAME: &str = "market.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "market=debug,info")
    pub log_level: String,
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Echo log lines to stdout
    pub stdout: bool,
    /// Write the file log as JSON lines
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_dir: PathBuf::from("logs"),
            stdout: false,
            json: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_level: lib_utils::get_env_or("RUST_LOG", DEFAULT_LOG_FILTER),
            log_dir: PathBuf::from(lib_utils::get_env_or("MARKET_LOG_DIR", "logs")),
            stdout: flag("MARKET_LOG_STDOUT"),
            json: flag("MARKET_LOG_JSON"),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

fn flag(name: &'static str) -> bool {
    lib_utils::get_env(name)
        .map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
