use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a forward or reverse calculation.
///
/// `tax_per_bracket` holds the per-part tax for each bracket that was
/// reached, in table order. Brackets above the one containing the
/// per-part income are absent rather than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross income: the clamped input for a forward calculation, or the
    /// solved income for a reverse one.
    pub gross_income: Decimal,

    /// Household parts used as divisor (at least 1).
    pub parts: Decimal,

    /// Per-part tax for each bracket reached.
    pub tax_per_bracket: Vec<Decimal>,

    /// Sum of `tax_per_bracket` multiplied by `parts`, unrounded.
    pub total_tax: Decimal,

    /// `total_tax` rounded to the nearest unit.
    pub rounded_tax_due: Decimal,
}

impl TaxResult {
    /// Income left after paying the rounded tax.
    pub fn net_income(&self) -> Decimal {
        self.gross_income - self.rounded_tax_due
    }

    /// Tax owed for a single part, zero if `parts` is zero.
    pub fn tax_per_part(&self) -> Decimal {
        self.total_tax
            .checked_div(self.parts)
            .unwrap_or(Decimal::ZERO)
    }

    /// Per-part tax for bracket `index`, zero if it was never reached.
    pub fn bracket_tax(
        &self,
        index: usize,
    ) -> Decimal {
        self.tax_per_bracket
            .get(index)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample() -> TaxResult {
        TaxResult {
            gross_income: dec!(60000),
            parts: dec!(2),
            tax_per_bracket: vec![dec!(0), dec!(1715.45), dec!(1302.30)],
            total_tax: dec!(6035.50),
            rounded_tax_due: dec!(6036),
        }
    }

    #[test]
    fn net_income_subtracts_rounded_tax() {
        assert_eq!(sample().net_income(), dec!(53964));
    }

    #[test]
    fn tax_per_part_divides_total_by_parts() {
        assert_eq!(sample().tax_per_part(), dec!(3017.75));
    }

    #[test]
    fn bracket_tax_is_zero_past_last_reached_bracket() {
        let result = sample();

        assert_eq!(result.bracket_tax(1), dec!(1715.45));
        assert_eq!(result.bracket_tax(4), Decimal::ZERO);
    }

    #[test]
    fn tax_per_part_is_zero_for_zero_parts() {
        let result = TaxResult {
            parts: Decimal::ZERO,
            ..sample()
        };

        assert_eq!(result.tax_per_part(), Decimal::ZERO);
    }
}
