//! # Environment Variables
//!
//! Reading and parsing of configuration values from the process environment.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
///
/// Blank values are treated as missing so an empty `KEY=` line in a `.env`
/// file falls back to defaults.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(Error::MissingEnv(name)),
    }
}

/// Get an environment variable, or `default` when it is unset.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    get_env(name).unwrap_or_else(|_| default.to_string())
}

/// Get and parse an environment variable.
///
/// Returns `Ok(None)` when the variable is unset and an error only when a
/// value is present but cannot be parsed.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<Option<T>, Error> {
    match get_env(name) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::WrongFormat(name)),
        Err(Error::MissingEnv(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingEnv(name) => write!(fmt, "missing environment variable {name}"),
            Error::WrongFormat(name) => write!(fmt, "environment variable {name} has the wrong format"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
