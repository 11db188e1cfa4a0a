//! Tax calculations over a [`BracketTable`](crate::BracketTable).
//!
//! Every calculator borrows its bracket table explicitly and never fails:
//! malformed input is clamped (amounts to zero, parts to one) rather than
//! rejected. The only unrecoverable condition, a misconfigured table, is
//! caught earlier by [`BracketTable::new`](crate::BracketTable::new).

pub mod common;
pub mod forward;
pub mod parts;
pub mod reverse;

pub use forward::TaxCalculator;
pub use parts::calculate_parts;
pub use reverse::ReverseCalculator;
