//! Display-only price arithmetic.
//!
//! The ledger decides what is charged. These numbers feed the checkout
//! summary and nothing else; the wallet is always re-read after a purchase.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::format_money;

/// Flat surcharge shown at checkout (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn for_price(price: Decimal) -> Self {
        let subtotal = round_display(price);
        let tax = round_display(price * TAX_RATE);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }

    /// `(subtotal, tax, total)` formatted as money.
    pub fn formatted(&self) -> (String, String, String) {
        (
            format_money(self.subtotal),
            format_money(self.tax),
            format_money(self.total),
        )
    }
}

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
