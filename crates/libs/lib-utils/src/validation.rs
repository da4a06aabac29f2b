//! # Validation Utilities
//!
//! Field checks applied to listing data before it is sent to the service.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate maximum length (in characters).
pub fn validate_max_length(value: &str, max: usize, field_name: &str) -> Result<(), String> {
    if value.chars().count() > max {
        Err(format!("{} must be at most {} characters", field_name, max))
    } else {
        Ok(())
    }
}
