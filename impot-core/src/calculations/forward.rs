//! Forward calculation: gross income to tax due.
//!
//! Income is divided by the household parts and rounded up to a whole
//! unit, so an income of `10064.54` for one part is taxed as `10065`. The
//! per-part income is then taxed bracket by bracket up to and including
//! the bracket that contains it, and the per-part tax is multiplied back
//! by the number of parts.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use impot_core::{BracketTable, TaxCalculator};
//!
//! let table = BracketTable::france_2020();
//! let result = TaxCalculator::new(&table).calculate(dec!(30000), dec!(1));
//!
//! // 0 % up to 10 064, 11 % up to 25 659, 30 % on the remaining 4 341.
//! assert_eq!(result.tax_per_bracket, vec![dec!(0), dec!(1715.45), dec!(1302.30)]);
//! assert_eq!(result.total_tax, dec!(3017.75));
//! assert_eq!(result.rounded_tax_due, dec!(3018));
//! assert_eq!(result.net_income(), dec!(26982));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{
    amount_from_f64, parts_from_f64, round_to_unit, sanitize_amount, sanitize_parts,
};
use crate::{BracketTable, TaxResult};

/// Calculator for the tax due on a gross income.
///
/// Borrows the bracket table; it holds no other state, so one calculator
/// can serve any number of calculations.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    table: &'a BracketTable,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Calculates the tax due on `gross_income` for a household of `parts`.
    ///
    /// Negative income is treated as zero and parts below 1 as 1.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        parts: Decimal,
    ) -> TaxResult {
        let gross_income = sanitize_amount(gross_income);
        let parts = sanitize_parts(parts);

        let per_part_income = self.per_part_income(gross_income, parts);
        let tax_per_bracket = self.tax_per_bracket(per_part_income);

        let total_tax = tax_per_bracket.iter().sum::<Decimal>() * parts;
        let rounded_tax_due = round_to_unit(total_tax);

        debug!(
            gross_income = %gross_income,
            parts = %parts,
            per_part_income = %per_part_income,
            brackets_reached = tax_per_bracket.len(),
            total_tax = %total_tax,
            "forward calculation complete"
        );

        TaxResult {
            gross_income,
            parts,
            tax_per_bracket,
            total_tax,
            rounded_tax_due,
        }
    }

    /// Same as [`calculate`](Self::calculate) for raw floating-point input.
    ///
    /// NaN and infinite income is treated as zero, NaN and infinite parts
    /// as 1.
    pub fn calculate_f64(
        &self,
        gross_income: f64,
        parts: f64,
    ) -> TaxResult {
        self.calculate(amount_from_f64(gross_income), parts_from_f64(parts))
    }

    /// Income attributed to one part, rounded up to a whole unit.
    fn per_part_income(
        &self,
        gross_income: Decimal,
        parts: Decimal,
    ) -> Decimal {
        (gross_income / parts).ceil()
    }

    /// Per-part tax for every bracket up to the one containing
    /// `per_part_income`.
    fn tax_per_bracket(
        &self,
        per_part_income: Decimal,
    ) -> Vec<Decimal> {
        let containing = self.table.position_containing(per_part_income);

        self.table.brackets()[..=containing]
            .iter()
            .map(|bracket| bracket.tax_on(per_part_income))
            .collect()
    }
}
