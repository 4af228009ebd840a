//! Month-granularity calendar positions.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A (year, month) pair with `month` guaranteed to lie in `1..=12` and
/// `year` inside the range chrono's `NaiveDate` can represent.
///
/// Ordering is chronological. All month arithmetic in the crate goes
/// through this type, so a forecast can never be built for month 0 or 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i32, u32)", into = "(i32, u32)")]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Create a calendar month, rejecting month numbers outside `1..=12`
    /// and years chrono cannot represent.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::InvalidMonth { month });
        }
        if !year_range().contains(&year) {
            return Err(ForecastError::InvalidParameter(format!(
                "year {year} outside supported range {}..={}",
                NaiveDate::MIN.year(),
                NaiveDate::MAX.year()
            )));
        }
        Ok(Self { year, month })
    }

    /// Earliest representable month.
    pub fn min_value() -> Self {
        Self::from_date(NaiveDate::MIN)
    }

    /// Latest representable month.
    pub fn max_value() -> Self {
        Self::from_date(NaiveDate::MAX)
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month; December rolls over to January of the next year.
    /// `None` past [`max_value`](Self::max_value).
    pub fn succ_opt(&self) -> Option<Self> {
        self.checked_add_months(1)
    }

    /// Shift by `months`, or `None` if the result leaves the supported range.
    pub fn checked_add_months(&self, months: i64) -> Option<Self> {
        let index = self.ordinal().checked_add(months)?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        if !year_range().contains(&year) {
            return None;
        }
        Some(Self {
            year,
            month: index.rem_euclid(12) as u32 + 1,
        })
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &CalendarMonth) -> i64 {
        other.ordinal() - self.ordinal()
    }

    /// Date of the given day in this month, if that day exists.
    pub fn to_date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }
}

fn year_range() -> std::ops::RangeInclusive<i32> {
    NaiveDate::MIN.year()..=NaiveDate::MAX.year()
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for CalendarMonth {
    type Err = ForecastError;

    /// Parse `YYYY-MM` or a full `YYYY-MM-DD` date.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| ForecastError::Parse(format!("unrecognised month '{s}'")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| ForecastError::Parse(format!("bad year in '{s}'")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| ForecastError::Parse(format!("bad month in '{s}'")))?;
        Self::new(year, month)
    }
}

impl TryFrom<(i32, u32)> for CalendarMonth {
    type Error = ForecastError;

    fn try_from((year, month): (i32, u32)) -> Result<Self> {
        Self::new(year, month)
    }
}

impl From<CalendarMonth> for (i32, u32) {
    fn from(m: CalendarMonth) -> Self {
        (m.year, m.month)
    }
}
