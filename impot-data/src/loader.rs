//! CSV loader for bracket tables.
//!
//! ## CSV Format
//!
//! | Column        | Required | Type    | Notes                                   |
//! |---------------|----------|---------|-----------------------------------------|
//! | `lower_bound` | yes      | decimal | First unit taxed at this rate           |
//! | `upper_bound` | no       | decimal | Last unit taxed; leave empty for the top bracket |
//! | `rate`        | yes      | decimal | Marginal rate as a fraction, e.g. `0.30` |
//!
//! Rows must be in ascending order. Whitespace around values is ignored.
//!
//! ```csv
//! lower_bound,upper_bound,rate
//! 0,10064,0
//! 10065,25659,0.11
//! 25660,,0.30
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use impot_core::{Bracket, BracketTable, BracketTableError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket data.
#[derive(Debug, Error)]
pub enum BracketTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] BracketTableError),
}

impl From<csv::Error> for BracketTableLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a bracket CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BracketRecord> for Bracket {
    fn from(record: BracketRecord) -> Self {
        Bracket::new(record.lower_bound, record.upper_bound, record.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables stored as CSV.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader, in file order.
    ///
    /// The records are not validated as a table; see [`Self::load`].
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketTableLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and validate a bracket table from a CSV reader.
    ///
    /// # Errors
    ///
    /// * [`BracketTableLoaderError::CsvParse`] if the CSV is malformed.
    /// * [`BracketTableLoaderError::InvalidTable`] if the rows do not form a
    ///   valid table (gaps, rate of 1 or more, bounded top bracket, ...).
    pub fn load<R: Read>(reader: R) -> Result<BracketTable, BracketTableLoaderError> {
        let records = Self::parse(reader)?;
        debug!(records = records.len(), "parsed bracket records");

        let brackets = records.into_iter().map(Bracket::from).collect();
        Ok(BracketTable::new(brackets)?)
    }

    /// Convenience wrapper around [`Self::load`] for in-memory text.
    pub fn load_from_str(input: &str) -> Result<BracketTable, BracketTableLoaderError> {
        Self::load(input.as_bytes())
    }

    /// Convenience wrapper around [`Self::load`] for a file on disk.
    pub fn load_from_file(path: &Path) -> Result<BracketTable, BracketTableLoaderError> {
        let file = File::open(path).map_err(|source| BracketTableLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEST_CSV: &str = r#"lower_bound,upper_bound,rate
0,10064,0
10065,25659,0.11
25660,73369,0.30
73370,157806,0.41
157807,,0.45
"#;

    #[test]
    fn test_parse_csv_single_bracket() {
        let csv = "lower_bound,upper_bound,rate\n0,10064,0";

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BracketRecord {
                lower_bound: dec!(0),
                upper_bound: Some(dec!(10064)),
                rate: dec!(0),
            }]
        );
    }

    #[test]
    fn test_parse_csv_unbounded_upper() {
        let csv = "lower_bound,upper_bound,rate\n157807,,0.45";

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].upper_bound, None);
        assert_eq!(records[0].rate, dec!(0.45));
    }

    #[test]
    fn test_parse_csv_whitespace_upper_is_unbounded() {
        let csv = "lower_bound,upper_bound,rate\n 157807 ,   , 0.45 ";

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].lower_bound, dec!(157807));
        assert_eq!(records[0].upper_bound, None);
    }

    #[test]
    fn test_parse_csv_invalid_decimal() {
        let csv = "lower_bound,upper_bound,rate\nzero,10064,0";

        let result = BracketTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_parse_csv_wrong_column_count() {
        let csv = "lower_bound,upper_bound,rate\n0,10064";

        let result = BracketTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketTableLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_load_full_table_matches_builtin() {
        let table = BracketTableLoader::load_from_str(TEST_CSV).expect("Failed to load table");

        assert_eq!(table, BracketTable::france_2020());
    }

    #[test]
    fn test_load_rejects_rate_of_one() {
        let csv = "lower_bound,upper_bound,rate\n0,,1";

        let result = BracketTableLoader::load_from_str(csv);

        assert!(matches!(
            result,
            Err(BracketTableLoaderError::InvalidTable(
                BracketTableError::InvalidRate { index: 0, .. }
            ))
        ));
    }

    #[test]
    fn test_load_rejects_oversized_bound() {
        let csv = "lower_bound,upper_bound,rate\n\
                   0,79228162514264337593543950335,0.1\n\
                   0,,0.2";

        let result = BracketTableLoader::load_from_str(csv);

        assert!(matches!(
            result,
            Err(BracketTableLoaderError::InvalidTable(
                BracketTableError::BoundTooLarge { index: 0, .. }
            ))
        ));
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let result = BracketTableLoader::load_from_str("lower_bound,upper_bound,rate\n");

        assert!(matches!(
            result,
            Err(BracketTableLoaderError::InvalidTable(BracketTableError::Empty))
        ));
    }
}
