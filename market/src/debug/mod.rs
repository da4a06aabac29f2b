//! # Logging Infrastructure
//!
//! File-based structured logging for the marketplace core and its shells.
//!
//! ## Features
//!
//! - **File logging**: `logs/market.log`, rotated daily, non-blocking writer
//! - **JSON output**: optional, for log shippers
//! - **Console echo**: optional, for interactive runs
//! - **Panic hook**: panics are written to the log before unwinding
//!
//! ## Usage
//!
//! ```rust,no_run
//! use market::debug::{self, LogConfig};
//!
//! let config = LogConfig::from_env();
//! // Keep the guard alive until exit so buffered lines are flushed.
//! let _guard = debug::init_logger(&config);
//!
//! tracing::info!(endpoint = "/items", count = 12, "Catalog loaded");
//! ```
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default `market=info,warn`)
//! - `MARKET_LOG_DIR`: Log directory (default `logs`)
//! - `MARKET_LOG_STDOUT`: `1` adds a console layer
//! - `MARKET_LOG_JSON`: `1` writes the file log as JSON lines

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init as init_logger;
