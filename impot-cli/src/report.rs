//! Plain-text rendering of calculation results.

use std::fmt;

use impot_core::calculations::common::round_half_up;
use impot_core::{Bracket, BracketTable, TaxResult};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 24;
const AMOUNT_WIDTH: usize = 14;

fn money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn band(bracket: &Bracket) -> String {
    match bracket.upper_bound {
        Some(upper) => format!("{} to {}", bracket.lower_bound, upper),
        None => format!("above {}", bracket.lower_bound),
    }
}

/// A result laid out against the full bracket table.
///
/// Brackets that were never reached are shown with zero tax.
pub struct TaxReport<'a> {
    table: &'a BracketTable,
    result: &'a TaxResult,
}

impl<'a> TaxReport<'a> {
    pub fn new(
        table: &'a BracketTable,
        result: &'a TaxResult,
    ) -> Self {
        Self { table, result }
    }
}

impl fmt::Display for TaxReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;

        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Gross income", money(r.gross_income))?;
        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Parts", r.parts.normalize())?;
        writeln!(f)?;

        for (index, bracket) in self.table.iter().enumerate() {
            writeln!(
                f,
                "{:<LABEL_WIDTH$}{:>6}{:>AMOUNT_WIDTH$}",
                band(bracket),
                percent(bracket.rate),
                money(r.bracket_tax(index))
            )?;
        }
        writeln!(f)?;

        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Tax per part", money(r.tax_per_part()))?;
        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Total tax", money(r.total_tax))?;
        writeln!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Tax due", r.rounded_tax_due)?;
        write!(f, "{:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", "Net income", money(r.net_income()))
    }
}

/// The bracket table on its own.
pub struct BracketListing<'a>(pub &'a BracketTable);

impl fmt::Display for BracketListing<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut lines = self.0.iter().peekable();
        while let Some(bracket) = lines.next() {
            write!(f, "{:<LABEL_WIDTH$}{:>6}", band(bracket), percent(bracket.rate))?;
            if lines.peek().is_some() {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
