//! Calendar month value
//!
//! Used for card expiry dates and the monthly usage anchor.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A year and month with no day component.
///
/// Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Errors from building or parsing a YearMonth
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid year-month: {0}")]
pub struct YearMonthError(pub String);

impl YearMonth {
    /// Create a YearMonth; `month` is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn plus_years(&self, years: i32) -> Self {
        Self {
            year: self.year.saturating_add(years),
            month: self.month,
        }
    }

    /// Whether this month is strictly after `other`.
    pub fn is_after(&self, other: &YearMonth) -> bool {
        self > other
    }

    /// Expiry as printed on a card face, e.g. `10/31`.
    pub fn to_card_face(&self) -> String {
        format!("{:02}/{:02}", self.month, self.year.rem_euclid(100))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    /// Parses `YYYY-MM`; years past 9999 carry more digits, as `Display` writes them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || YearMonthError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() < 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}
