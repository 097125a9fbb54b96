//! Arithmetic helpers shared by the allocation steps and by presentation code.

use rust_decimal::Decimal;

/// Rounds a monetary value to cents using half-up rounding.
///
/// The engine itself never rounds; this is for display and for values a
/// caller chooses to store rounded.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(428.571428)), dec!(428.57));
/// assert_eq!(round_half_up(dec!(0.125)), dec!(0.13));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero from below.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Sums amounts, pinning the total at [`Decimal::MAX`] instead of overflowing.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use budget_core::calculations::common::saturating_sum;
///
/// assert_eq!(saturating_sum([dec!(600), dec!(62.50)]), dec!(662.50));
/// assert_eq!(saturating_sum([Decimal::MAX, Decimal::ONE]), Decimal::MAX);
/// ```
pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |total, value| total.saturating_add(value))
}

/// Integer ceiling of `numerator / denominator` for a positive denominator.
///
/// Correct for negative numerators: `ceil_div(-5, 14) == 0` and
/// `ceil_div(-14, 14) == -1`.
///
/// # Examples
///
/// ```
/// use budget_core::calculations::common::ceil_div;
///
/// assert_eq!(ceil_div(28, 14), 2);
/// assert_eq!(ceil_div(29, 14), 3);
/// assert_eq!(ceil_div(-5, 14), 0);
/// ```
pub fn ceil_div(
    numerator: i64,
    denominator: i64,
) -> i64 {
    debug_assert!(denominator > 0, "ceil_div needs a positive denominator");
    (numerator + denominator - 1).div_euclid(denominator)
}
