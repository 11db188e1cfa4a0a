mod bracket;
mod bracket_table;
mod household;
mod tax_result;

pub use bracket::Bracket;
pub use bracket_table::{BracketTable, BracketTableError};
pub use household::{Household, PartsPolicy};
pub use tax_result::TaxResult;
