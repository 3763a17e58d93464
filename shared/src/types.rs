//! Common types for the shared crate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Error raised when parsing a billing-period key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid billing period '{0}', expected YYYY-MM")]
pub struct PeriodParseError(pub String);

/// Billing period key (`YYYY-MM`)
///
/// Zero-padded, so lexicographic order equals chronological order and
/// the key can be used directly in cache keys and wire payloads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    /// Build a period from its parts. Month must be 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(PeriodParseError(format!("{}-{}", year, month)));
        }
        Ok(Self(format!("{:04}-{:02}", year, month)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PeriodParseError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).map_err(|_| err())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<chrono::NaiveDate> for Period {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self(format!("{:04}-{:02}", date.year(), date.month()))
    }
}
