//! # Shared Utility Functions
//!
//! Display helpers used by the marketplace client and its shells.
//!
//! ## Money
//!
//! - [`format_money`] - Render an amount with a currency sign and two decimals
//!
//! ## Identifiers
//!
//! - [`format_id`] - Keep the first N characters of an identifier
//! - [`truncate_id`] - `format_id` with the 8 character default
//!
//! ## Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use shared::utils::{format_money, truncate_id};
//!
//! assert_eq!(format_money(Decimal::new(1080, 1)), "$108.00");
//! assert_eq!(truncate_id("9f1c2ab4-77aa-4c1e"), "9f1c2ab4...");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount for display: `$` sign, two decimals, half-up rounding.
///
/// Display only. Amounts used in requests are never rounded.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Keep the first `prefix_len` characters of an identifier, followed by `...`.
///
/// Identifiers no longer than `prefix_len` are returned as-is.
pub fn format_id(id: &str, prefix_len: usize) -> String {
    if id.chars().count() <= prefix_len {
        return id.to_string();
    }
    let prefix: String = id.chars().take(prefix_len).collect();
    format!("{}...", prefix)
}

/// Format an identifier with the default 8-character prefix.
pub fn truncate_id(id: &str) -> String {
    format_id(id, 8)
}
