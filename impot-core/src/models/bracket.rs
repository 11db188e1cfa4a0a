use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A contiguous income band taxed at a single marginal rate.
///
/// Bounds are inclusive whole units: a bracket running from `10065` to
/// `25659` taxes 15 595 units. `upper_bound` is `None` for the top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Decimal,
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl Bracket {
    pub fn new(
        lower_bound: Decimal,
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate,
        }
    }

    /// The last unit *below* this bracket (`lower_bound - 1`).
    ///
    /// Taxable amounts are measured from here so that the lower bound
    /// itself is taxed at this bracket's rate.
    pub fn floor(&self) -> Decimal {
        self.lower_bound - Decimal::ONE
    }

    /// Whether a per-part income falls at or below this bracket's ceiling.
    ///
    /// Always true for the unbounded bracket.
    pub fn contains(
        &self,
        per_part_income: Decimal,
    ) -> bool {
        self.upper_bound
            .is_none_or(|upper| per_part_income <= upper)
    }

    /// Tax owed on the slice of `per_part_income` that lies in this bracket.
    pub fn tax_on(
        &self,
        per_part_income: Decimal,
    ) -> Decimal {
        let top = match self.upper_bound {
            Some(upper) => upper.min(per_part_income),
            None => per_part_income,
        };
        (top - self.floor()) * self.rate
    }

    /// Tax owed when income fills the bracket completely.
    ///
    /// `None` for the unbounded bracket.
    pub fn full_tax(&self) -> Option<Decimal> {
        self.upper_bound
            .map(|upper| (upper - self.floor()) * self.rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn eleven_percent() -> Bracket {
        Bracket::new(dec!(10065), Some(dec!(25659)), dec!(0.11))
    }

    #[test]
    fn floor_is_one_unit_below_lower_bound() {
        assert_eq!(eleven_percent().floor(), dec!(10064));
    }

    #[test]
    fn contains_includes_upper_bound() {
        let bracket = eleven_percent();

        assert!(bracket.contains(dec!(25659)));
        assert!(!bracket.contains(dec!(25660)));
    }

    #[test]
    fn unbounded_contains_everything() {
        let bracket = Bracket::new(dec!(157807), None, dec!(0.45));

        assert_eq!(bracket.upper_bound, None);
        assert!(bracket.contains(dec!(999999999)));
    }

    #[test]
    fn tax_on_caps_at_upper_bound() {
        let bracket = eleven_percent();

        assert_eq!(bracket.tax_on(dec!(30000)), dec!(1715.45));
        assert_eq!(bracket.tax_on(dec!(20000)), dec!(1092.96));
    }

    #[test]
    fn full_tax_matches_tax_at_upper_bound() {
        let bracket = eleven_percent();

        assert_eq!(bracket.full_tax(), Some(dec!(1715.45)));
        assert_eq!(Bracket::new(dec!(157807), None, dec!(0.45)).full_tax(), None);
    }
}
