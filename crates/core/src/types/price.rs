//! Money representation and display formatting.
//!
//! Amounts are `rust_decimal::Decimal` everywhere; rendering happens only at
//! the presentation boundary via [`format_amount`]. Formatting is
//! deliberately simple: the store's configured symbol followed by the amount
//! with exactly two decimal places. No locale-aware separators and no
//! per-currency decimal rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with its display currency symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// Display symbol from the store settings (e.g., "$", "₦").
    pub symbol: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, symbol: String) -> Self {
        Self { amount, symbol }
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.amount, &self.symbol)
    }
}

/// Format an amount as `symbol` + two-decimal rendering.
///
/// `Decimal` rounding uses banker's rounding via `round_dp`; display always
/// carries exactly two fractional digits.
#[must_use]
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    format!("{symbol}{:.2}", amount.round_dp(2))
}
