//! Client configuration from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MARKET_API_URL` | `http://127.0.0.1:8000` |
//! | `MARKET_HTTP_TIMEOUT_SECS` | `10` |
//! | `MARKET_SESSION_FILE` | `.flipzy/session.json` |
//!
//! A `.env` file in the working directory is loaded first when present.

use std::path::PathBuf;
use std::time::Duration;

use lib_utils::{get_env_or, get_env_parse};

use crate::core::error::{MarketError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SESSION_FILE: &str = ".flipzy/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Ledger/listing service base URL, without trailing slash.
    pub api_url: String,
    pub http_timeout: Duration,
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(MarketError::Config(format!(".env: {}", e)));
            }
        }
        Self::from_process_env()
    }

    /// Same as [`ClientConfig::from_env`] without touching `.env`.
    pub fn from_process_env() -> Result<Self> {
        let api_url = normalize_api_url(
            "MARKET_API_URL",
            &get_env_or("MARKET_API_URL", DEFAULT_API_URL),
        )?;

        let timeout_secs = get_env_parse::<u64>("MARKET_HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(MarketError::Config(
                "MARKET_HTTP_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            http_timeout: Duration::from_secs(timeout_secs),
            session_file: PathBuf::from(get_env_or("MARKET_SESSION_FILE", DEFAULT_SESSION_FILE)),
        })
    }

    /// Replace the base URL, applying the same checks as `MARKET_API_URL`.
    pub fn with_api_url(mut self, url: &str) -> Result<Self> {
        self.api_url = normalize_api_url("--api-url", url)?;
        Ok(self)
    }
}

/// Trim whitespace and trailing slashes; only http(s) URLs are accepted.
fn normalize_api_url(source: &str, raw: &str) -> Result<String> {
    let api_url = raw.trim().trim_end_matches('/').to_string();
    if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
        return Err(MarketError::Config(format!(
            "{} must start with http:// or https://, got '{}'",
            source, api_url
        )));
    }
    Ok(api_url)
}
