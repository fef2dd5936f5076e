//! Monetary rounding.
//!
//! Every calculator rounds its output exactly once, to the cent, half-up.
//! Intermediate values keep full precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept on monetary amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Rounds an amount to the cent, half away from zero, and fixes its scale at two.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("106.875").unwrap()).to_string(), "106.88");
/// assert_eq!(round_currency(Decimal::from(7500)).to_string(), "7500.00");
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}
