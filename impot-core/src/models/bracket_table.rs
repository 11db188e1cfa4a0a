use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Bracket;
use crate::calculations::common::MAX_AMOUNT;

/// Errors raised when a bracket table is misconfigured.
///
/// These are configuration errors, not user-input errors: a table that
/// passes [`BracketTable::new`] can never make a calculator fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    /// No brackets were provided.
    #[error("bracket table is empty")]
    Empty,

    /// The first bracket starts below zero.
    #[error("first bracket must start at or above 0, got {0}")]
    NegativeLowerBound(Decimal),

    /// A rate is outside `[0, 1)`.
    #[error("bracket {index} has rate {rate}; rates must be in [0, 1)")]
    InvalidRate { index: usize, rate: Decimal },

    /// A bounded bracket ends before it starts.
    #[error("bracket {index} has upper bound {upper} below lower bound {lower}")]
    InvertedBounds {
        index: usize,
        lower: Decimal,
        upper: Decimal,
    },

    /// A bracket does not start one unit after the previous one ends.
    #[error("bracket {index} starts at {found}, expected {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// A bracket other than the last has no upper bound.
    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedBeforeLast(usize),

    /// The last bracket has an upper bound.
    #[error("last bracket must be unbounded, got upper bound {0}")]
    BoundedLast(Decimal),

    /// A bound is larger than any amount the calculators accept.
    #[error("bracket {index} has bound {bound}; bounds must not exceed {max}", max = MAX_AMOUNT)]
    BoundTooLarge { index: usize, bound: Decimal },
}

/// An ordered, validated sequence of [`Bracket`]s.
///
/// Brackets ascend by lower bound, each starting one unit after the
/// previous one ends, and only the last one is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Validates and wraps `brackets`.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if:
    /// - `brackets` is empty
    /// - the first lower bound is negative
    /// - any rate is not in `[0, 1)`
    /// - any bound exceeds [`MAX_AMOUNT`]
    /// - any bounded bracket has `upper_bound < lower_bound`
    /// - brackets are not contiguous
    /// - an unbounded bracket appears before the end, or the last is bounded
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, BracketTableError> {
        let first = brackets.first().ok_or(BracketTableError::Empty)?;
        if first.lower_bound < Decimal::ZERO {
            return Err(BracketTableError::NegativeLowerBound(first.lower_bound));
        }

        let last_index = brackets.len() - 1;
        let mut expected_lower = first.lower_bound;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            if let Some(bound) = [Some(bracket.lower_bound), bracket.upper_bound]
                .into_iter()
                .flatten()
                .find(|bound| *bound > MAX_AMOUNT)
            {
                return Err(BracketTableError::BoundTooLarge { index, bound });
            }

            if bracket.lower_bound != expected_lower {
                return Err(BracketTableError::NotContiguous {
                    index,
                    expected: expected_lower,
                    found: bracket.lower_bound,
                });
            }

            match bracket.upper_bound {
                Some(upper) if index == last_index => {
                    return Err(BracketTableError::BoundedLast(upper));
                }
                Some(upper) if upper < bracket.lower_bound => {
                    return Err(BracketTableError::InvertedBounds {
                        index,
                        lower: bracket.lower_bound,
                        upper,
                    });
                }
                Some(upper) => {
                    expected_lower = upper
                        .checked_add(Decimal::ONE)
                        .ok_or(BracketTableError::BoundTooLarge { index, bound: upper })?;
                }
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedBeforeLast(index));
                }
                None => {}
            }
        }

        Ok(Self { brackets })
    }

    /// The French income-tax scale applied to 2020 income.
    pub fn france_2020() -> Self {
        let bracket = |lower: i64, upper: Option<i64>, rate_pct: i64| Bracket {
            lower_bound: Decimal::from(lower),
            upper_bound: upper.map(Decimal::from),
            rate: Decimal::new(rate_pct, 2),
        };

        Self {
            brackets: vec![
                bracket(0, Some(10_064), 0),
                bracket(10_065, Some(25_659), 11),
                bracket(25_660, Some(73_369), 30),
                bracket(73_370, Some(157_806), 41),
                bracket(157_807, None, 45),
            ],
        }
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    /// Always false; kept for symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Index of the first bracket whose upper bound is at or above
    /// `per_part_income`. Falls through to the unbounded last bracket.
    pub fn position_containing(
        &self,
        per_part_income: Decimal,
    ) -> usize {
        self.brackets
            .iter()
            .position(|b| b.contains(per_part_income))
            .unwrap_or(self.brackets.len() - 1)
    }
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::france_2020()
    }
}

impl<'de> Deserialize<'de> for BracketTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let brackets = Vec::<Bracket>::deserialize(deserializer)?;
        Self::new(brackets).map_err(serde::de::Error::custom)
    }
}
