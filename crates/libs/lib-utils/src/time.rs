//! # Time Utilities
//!
//! Parsing of the timestamps the ledger service reports.
//!
//! Transaction records arrive with either a full RFC3339 timestamp, a naive
//! `YYYY-MM-DD HH:MM:SS` datetime, or only a calendar date. All three are
//! normalized to UTC; naive values are taken as UTC and dates as midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse RFC3339 string to UTC DateTime.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(moment)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::FailToDateParse(moment.to_string()))
}

/// Parse any timestamp shape the ledger emits.
pub fn parse_timestamp(moment: &str) -> Result<DateTime<Utc>, Error> {
    let moment = moment.trim();
    if let Ok(dt) = parse_utc(moment) {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(moment, fmt) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(moment, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::FailToDateParse(moment.to_string()))
}

/// Format the calendar date of a timestamp (`YYYY-MM-DD`).
pub fn format_date(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d").to_string()
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::FailToDateParse(moment) => write!(fmt, "cannot parse timestamp '{moment}'"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
