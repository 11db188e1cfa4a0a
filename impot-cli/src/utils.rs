use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Currency markers and grouping characters that never carry value:
/// ASCII and non-breaking spaces, underscores, `€` and `EUR`.
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s\u{00A0}\u{202F}_€]|eur").expect("noise pattern is valid")
});

/// A lone comma followed by one or two digits is a French decimal comma.
static DECIMAL_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+,\d{1,2}$").expect("decimal comma pattern is valid"));

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for decimal parsing.
///
/// Strips currency markers and grouping spaces, turns a decimal comma
/// (`"1234,56"`) into a point, and drops commas used as thousands
/// separators (`"1,234.56"`).
fn normalize_decimal_input(s: &str) -> String {
    let stripped = NOISE.replace_all(s.trim(), "");
    if DECIMAL_COMMA.is_match(&stripped) {
        stripped.replacen(',', ".", 1)
    } else {
        stripped.replace(',', "")
    }
}

/// Parses a string into a [`Decimal`].
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Parses an amount the way a live input field would: anything that is
/// not a number becomes 0. Logs a warning when input is discarded.
pub fn parse_amount(s: &str) -> Decimal {
    parse_decimal(s).unwrap_or_else(|e| {
        tracing::warn!(input = %s, "treating unparsable amount as 0: {}", e);
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_accepts_french_formatting() {
        assert_eq!(parse_decimal("30 000").unwrap(), dec!(30000));
        assert_eq!(parse_decimal("30\u{202F}000,50 €").unwrap(), dec!(30000.50));
        assert_eq!(parse_decimal("1234,5").unwrap(), dec!(1234.5));
    }

    #[test]
    fn parse_decimal_accepts_underscores_and_currency_code() {
        assert_eq!(parse_decimal("25_659").unwrap(), dec!(25659));
        assert_eq!(parse_decimal("500 EUR").unwrap(), dec!(500));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_keeps_sign() {
        assert_eq!(parse_decimal("-500").unwrap(), dec!(-500));
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(parse_decimal("abc").is_err());
    }

    #[test]
    fn parse_amount_maps_garbage_to_zero() {
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_amount("42"), dec!(42));
    }
}
