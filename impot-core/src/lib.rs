pub mod calculations;
pub mod models;

pub use calculations::{ReverseCalculator, TaxCalculator, calculate_parts};
pub use models::*;
