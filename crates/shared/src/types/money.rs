//! Monetary amount helpers.
//!
//! All amounts in Steward are `rust_decimal::Decimal`. Floating point is
//! never used for money, and the workspace lints deny float arithmetic to
//! keep it that way.

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance for amount comparisons.
///
/// Two amounts that differ by less than one cent are treated as equal when
/// matching statement lines against ledger transactions.
pub const AMOUNT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true when two amounts differ by less than [`AMOUNT_EPSILON`].
#[must_use]
pub fn amounts_equal(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() < AMOUNT_EPSILON
}

/// Rounds an amount to two decimal places, away from zero on midpoints.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
