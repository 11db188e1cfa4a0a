//! Reverse calculation: desired net income to required gross income.
//!
//! Rather than searching numerically, the calculator walks the brackets
//! and, for each bounded one, asks what a household would keep if its
//! per-part income filled the bracket exactly:
//!
//! ```text
//! theoretical_net = (upper - (full_bracket_tax + prior_tax)) × parts
//! ```
//!
//! The first bracket whose theoretical net exceeds the desired net (or the
//! unbounded top bracket) is where the answer lies. Within one bracket net
//! income is linear in per-part income, so it is solved directly:
//!
//! ```text
//! income = (net − parts × (lower − 1) × rate + parts × prior_tax)
//!          / (parts − parts × rate)
//! ```
//!
//! The divisor is never zero because [`BracketTable`] rejects rates of 1
//! or more.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use impot_core::{BracketTable, ReverseCalculator};
//!
//! let table = BracketTable::france_2020();
//! let result = ReverseCalculator::new(&table).calculate(dec!(26982), dec!(1));
//!
//! assert_eq!(result.gross_income, dec!(30000));
//! assert_eq!(result.rounded_tax_due, dec!(3018));
//! assert_eq!(result.net_income(), dec!(26982));
//! ```

use std::iter;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{
    amount_from_f64, max, parts_from_f64, round_to_unit, sanitize_amount, sanitize_parts,
};
use crate::{Bracket, BracketTable, TaxResult};

/// Calculator for the gross income needed to keep a given net income.
#[derive(Debug, Clone, Copy)]
pub struct ReverseCalculator<'a> {
    table: &'a BracketTable,
}

/// Where a desired net income lands in the bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SolvingBracket {
    index: usize,
    /// Per-part tax of every bracket below `index`, each filled completely.
    prior_tax: Decimal,
}

impl<'a> ReverseCalculator<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Calculates the gross income and tax for which a household of
    /// `parts` keeps exactly `desired_net` after paying the rounded tax.
    ///
    /// Negative net income is treated as zero and parts below 1 as 1.
    pub fn calculate(
        &self,
        desired_net: Decimal,
        parts: Decimal,
    ) -> TaxResult {
        let desired_net = sanitize_amount(desired_net);
        let parts = sanitize_parts(parts);

        let brackets = self.table.brackets();
        let solving = self.solving_bracket(desired_net, parts);
        let bracket = &brackets[solving.index];

        let per_part_income =
            self.per_part_income(bracket, solving.prior_tax, desired_net, parts);
        let partial_tax = max(
            Decimal::ZERO,
            (per_part_income - bracket.floor()) * bracket.rate,
        );

        let tax_per_bracket: Vec<Decimal> = brackets[..solving.index]
            .iter()
            .filter_map(Bracket::full_tax)
            .chain(iter::once(partial_tax))
            .collect();

        let total_tax = (solving.prior_tax + partial_tax) * parts;
        let rounded_tax_due = round_to_unit(total_tax);

        debug!(
            desired_net = %desired_net,
            parts = %parts,
            bracket = solving.index,
            per_part_income = %per_part_income,
            total_tax = %total_tax,
            "reverse calculation complete"
        );

        TaxResult {
            gross_income: desired_net + rounded_tax_due,
            parts,
            tax_per_bracket,
            total_tax,
            rounded_tax_due,
        }
    }

    /// Same as [`calculate`](Self::calculate) for raw floating-point input.
    pub fn calculate_f64(
        &self,
        desired_net: f64,
        parts: f64,
    ) -> TaxResult {
        self.calculate(amount_from_f64(desired_net), parts_from_f64(parts))
    }

    /// Finds the first bracket whose theoretical net exceeds `desired_net`,
    /// falling through to the unbounded top bracket.
    fn solving_bracket(
        &self,
        desired_net: Decimal,
        parts: Decimal,
    ) -> SolvingBracket {
        let brackets = self.table.brackets();
        let bounded = &brackets[..brackets.len() - 1];
        let mut prior_tax = Decimal::ZERO;

        for (index, bracket) in bounded.iter().enumerate() {
            let (Some(upper), Some(full_tax)) = (bracket.upper_bound, bracket.full_tax()) else {
                return SolvingBracket { index, prior_tax };
            };

            let theoretical_net = (upper - (full_tax + prior_tax)) * parts;
            if theoretical_net > desired_net {
                return SolvingBracket { index, prior_tax };
            }
            prior_tax += full_tax;
        }

        SolvingBracket {
            index: bounded.len(),
            prior_tax,
        }
    }

    /// Solves for the per-part income inside `bracket`.
    fn per_part_income(
        &self,
        bracket: &Bracket,
        prior_tax: Decimal,
        desired_net: Decimal,
        parts: Decimal,
    ) -> Decimal {
        let numerator =
            desired_net - parts * bracket.floor() * bracket.rate + parts * prior_tax;
        numerator / (parts - parts * bracket.rate)
    }
}
