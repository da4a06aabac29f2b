//! # Utilities Library
//!
//! Small helpers shared by the marketplace crates: environment variables,
//! ledger timestamp parsing and listing-field validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_or, get_env_parse};
pub use time::{format_date, parse_timestamp, parse_utc};
pub use validation::{validate_max_length, validate_not_empty};
