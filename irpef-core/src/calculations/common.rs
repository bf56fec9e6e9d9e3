//! Rounding and arithmetic helpers shared by the calculators.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a euro amount to cents, with midpoints rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpef_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(217.944)), dec!(217.94));
/// assert_eq!(round_half_up(dec!(3132.945)), dec!(3132.95));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use irpef_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-120.50), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// `part / whole × 100`, unrounded. A zero `whole` yields zero.
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    part.checked_div(whole)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}
