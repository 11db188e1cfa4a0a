//! Household parts ("quotient familial") calculation.
//!
//! A single adult counts for one part and a married couple for two.
//! Dependents add to that base according to a [`PartsPolicy`]:
//!
//! | Dependents | Capped | Flat |
//! |------------|--------|------|
//! | 1          | +0.5   | +0.5 |
//! | 2          | +1.0   | +1.0 |
//! | 3          | +2.0   | +1.5 |
//! | 4          | +3.0   | +2.0 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use impot_core::{PartsPolicy, calculate_parts};
//!
//! assert_eq!(calculate_parts(true, 3, PartsPolicy::Capped), dec!(4));
//! assert_eq!(calculate_parts(true, 3, PartsPolicy::Flat), dec!(3.5));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::PartsPolicy;

/// Number of dependents that count for half a part under the capped policy.
const HALF_PART_DEPENDENTS: i64 = 2;

/// Derives the parts divisor from household composition.
///
/// Negative `dependents` are treated as zero. The result is never below 1.
pub fn calculate_parts(
    is_married: bool,
    dependents: i64,
    policy: PartsPolicy,
) -> Decimal {
    if dependents < 0 {
        warn!(dependents, "negative dependent count; treating as zero");
    }
    let dependents = dependents.max(0);

    let adults = if is_married { Decimal::TWO } else { Decimal::ONE };
    let half = Decimal::new(5, 1);

    let for_dependents = match policy {
        PartsPolicy::Capped => {
            let halved = dependents.min(HALF_PART_DEPENDENTS);
            let whole = dependents - halved;
            Decimal::from(halved) * half + Decimal::from(whole)
        }
        PartsPolicy::Flat => Decimal::from(dependents) * half,
    };

    adults + for_dependents
}
