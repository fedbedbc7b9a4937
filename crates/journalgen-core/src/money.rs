//! Fixed-point money helpers.
//!
//! Journal amounts are carried at a fixed scale of two decimal places and
//! rounded half-up (away from zero on a tie). Binary floating point never
//! touches an amount.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every journal amount is carried at.
pub const AMOUNT_SCALE: u32 = 2;

/// The default balance tolerance (0.01).
#[must_use]
pub fn default_tolerance() -> Decimal {
    Decimal::new(1, AMOUNT_SCALE)
}

/// Round a number half-up to [`AMOUNT_SCALE`] places.
///
/// The result always has exactly two decimal places, so `1200` becomes
/// `1200.00` and `0.125` becomes `0.13`.
#[must_use]
pub fn round_amount(number: Decimal) -> Decimal {
    let mut rounded =
        number.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);
    rounded
}

/// Sum amounts, or `None` if the sum leaves the decimal range.
#[must_use]
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
}

/// Check whether two amounts are equal within `tolerance`.
#[must_use]
pub fn within_tolerance(left: Decimal, right: Decimal, tolerance: Decimal) -> bool {
    (left - right).abs() <= tolerance
}
