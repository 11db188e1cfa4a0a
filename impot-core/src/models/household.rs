use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::calculate_parts;

/// How dependents are converted into household parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartsPolicy {
    /// Half a part for each of the first two dependents, a full part for
    /// every dependent after that.
    #[default]
    Capped,
    /// Half a part per dependent, no matter how many.
    Flat,
}

impl PartsPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Capped => "capped",
            Self::Flat => "flat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "capped" => Some(Self::Capped),
            "flat" => Some(Self::Flat),
            _ => None,
        }
    }
}

/// Household composition used to derive the parts divisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub is_married: bool,
    /// Number of dependents. Negative values are treated as zero.
    pub dependents: i64,
}

impl Household {
    pub fn new(
        is_married: bool,
        dependents: i64,
    ) -> Self {
        Self {
            is_married,
            dependents,
        }
    }

    pub fn parts(
        &self,
        policy: PartsPolicy,
    ) -> Decimal {
        calculate_parts(self.is_married, self.dependents, policy)
    }
}
