//! Integration tests that load bracket tables from on-disk fixtures and
//! feed them to the calculators.

use std::path::{Path, PathBuf};

use impot_core::{BracketTable, BracketTableError, ReverseCalculator, TaxCalculator};
use impot_data::{BracketTableLoader, BracketTableLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

#[test]
fn test_load_2020_fixture_matches_builtin_table() {
    let table = BracketTableLoader::load_from_file(&fixture("brackets_2020.csv"))
        .expect("fixture should load");

    assert_eq!(table, BracketTable::france_2020());
}

#[test]
fn test_loaded_table_drives_both_calculators() {
    let table = BracketTableLoader::load_from_file(&fixture("brackets_2020.csv")).unwrap();

    let forward = TaxCalculator::new(&table).calculate(dec!(30000), dec!(1));
    assert_eq!(forward.rounded_tax_due, dec!(3018));

    let reverse = ReverseCalculator::new(&table).calculate(forward.net_income(), dec!(1));
    assert_eq!(reverse.gross_income, dec!(30000));
}

#[test]
fn test_load_gapped_fixture_is_rejected() {
    let result = BracketTableLoader::load_from_file(&fixture("brackets_gap.csv"));

    match result {
        Err(BracketTableLoaderError::InvalidTable(BracketTableError::NotContiguous {
            index,
            expected,
            found,
        })) => {
            assert_eq!(index, 1);
            assert_eq!(expected, dec!(10065));
            assert_eq!(found, dec!(10070));
        }
        other => panic!("expected NotContiguous, got {other:?}"),
    }
}

#[test]
fn test_load_nonexistent_file_returns_io_error() {
    let result = BracketTableLoader::load_from_file(Path::new("/this/path/does/not/exist.csv"));

    assert!(matches!(result, Err(BracketTableLoaderError::Io { .. })));
}
