//! Validation utilities for user input

use rust_decimal::Decimal;
use std::str::FromStr;

/// Longest listing name the service accepts.
pub const MAX_NAME_LENGTH: usize = 120;

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    fn from_check(check: Result<(), String>) -> Self {
        match check {
            Ok(()) => Self::ok(),
            Err(message) => Self::err(message),
        }
    }
}

/// Validate a listing name
pub fn validate_listing_name(name: &str) -> ValidationResult {
    let check = lib_utils::validate_not_empty(name, "Name")
        .and_then(|_| lib_utils::validate_max_length(name.trim(), MAX_NAME_LENGTH, "Name"));
    ValidationResult::from_check(check)
}

/// Validate a listing category
pub fn validate_category(category: &str) -> ValidationResult {
    ValidationResult::from_check(lib_utils::validate_not_empty(category, "Category"))
}

/// Prices may be zero (giveaways) but never negative
pub fn validate_price(price: Decimal) -> ValidationResult {
    if price.is_sign_negative() && !price.is_zero() {
        return ValidationResult::err("Price cannot be negative");
    }
    ValidationResult::ok()
}

/// Parse an amount typed by the user (`"25"`, `"25.50"`, `"$25.50"`).
pub fn parse_amount(input: &str) -> Result<Decimal, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Amount is required".to_string());
    }
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "");
    Decimal::from_str(&digits).map_err(|_| format!("'{}' is not a valid amount", trimmed))
}

/// Deposits must be strictly positive
pub fn validate_deposit_amount(amount: Decimal) -> ValidationResult {
    if amount <= Decimal::ZERO {
        return ValidationResult::err("Amount must be greater than 0");
    }
    ValidationResult::ok()
}
