//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used by the forward and
//! reverse calculators: rounding, and the clamping rules applied to raw
//! input so that no calculation ever fails on malformed numbers.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use tracing::warn;

/// Largest amount of money the calculators accept. Larger inputs are
/// clamped so that intermediate products cannot overflow a [`Decimal`].
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Largest parts divisor the calculators accept.
pub const MAX_PARTS: Decimal = dec!(1000);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest whole unit, midpoints away from zero.
///
/// This is the rounding applied to the tax actually payable.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(1715.45)), dec!(1715));
/// assert_eq!(round_to_unit(dec!(1715.5)), dec!(1716));
/// assert_eq!(round_to_unit(dec!(-0.5)), dec!(-1));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps an amount of money into `[0, MAX_AMOUNT]`.
///
/// Negative amounts are silently zeroed. Capping at [`MAX_AMOUNT`] logs a
/// warning since it changes an otherwise valid amount.
pub fn sanitize_amount(value: Decimal) -> Decimal {
    if value > MAX_AMOUNT {
        warn!(amount = %value, max = %MAX_AMOUNT, "amount exceeds supported maximum; capping");
        return MAX_AMOUNT;
    }
    max(value, Decimal::ZERO)
}

/// Clamps a parts divisor into `[1, MAX_PARTS]`, warning when capped.
pub fn sanitize_parts(value: Decimal) -> Decimal {
    if value > MAX_PARTS {
        warn!(parts = %value, max = %MAX_PARTS, "parts exceed supported maximum; capping");
        return MAX_PARTS;
    }
    max(value, Decimal::ONE)
}

/// Converts a raw floating-point amount, treating NaN, infinities and
/// negatives as zero. Finite values above [`MAX_AMOUNT`] are clamped.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::amount_from_f64;
///
/// assert_eq!(amount_from_f64(30000.0), dec!(30000));
/// assert_eq!(amount_from_f64(f64::NAN), Decimal::ZERO);
/// assert_eq!(amount_from_f64(-12.0), Decimal::ZERO);
/// ```
pub fn amount_from_f64(value: f64) -> Decimal {
    if !value.is_finite() || value <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).map_or(MAX_AMOUNT, sanitize_amount)
}

/// Converts a raw floating-point parts divisor, treating NaN, infinities
/// and values below 1 as 1. Finite values above [`MAX_PARTS`] are clamped.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use impot_core::calculations::common::parts_from_f64;
///
/// assert_eq!(parts_from_f64(2.5), dec!(2.5));
/// assert_eq!(parts_from_f64(f64::NAN), Decimal::ONE);
/// assert_eq!(parts_from_f64(0.0), Decimal::ONE);
/// ```
pub fn parts_from_f64(value: f64) -> Decimal {
    if !value.is_finite() || value < 1.0 {
        return Decimal::ONE;
    }
    Decimal::from_f64(value).map_or(MAX_PARTS, sanitize_parts)
}
