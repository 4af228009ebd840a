//! Calendar features derived from a forecast month.
//!
//! Season is a fixed partition of the month number; day-of-year is the
//! ordinal of a representative day inside the month (see
//! [`DayOfYearConvention`]).

use crate::core::CalendarMonth;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Meteorological season, coded 1..=4 for model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Autumn,
}

impl Season {
    /// Season of a month number in `1..=12`.
    ///
    /// Callers holding a [`CalendarMonth`] can rely on the range; any other
    /// value is a programming error.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => unreachable!("month number {month} outside 1..=12"),
        }
    }

    /// Numeric code fed to the model: winter 1, spring 2, summer 3, autumn 4.
    pub fn code(&self) -> u8 {
        match self {
            Season::Winter => 1,
            Season::Spring => 2,
            Season::Summer => 3,
            Season::Autumn => 4,
        }
    }
}

/// Which day of the month stands in for the whole month when computing
/// `day_of_year`.
///
/// Months have different lengths, so a forecast for "March" has no single
/// day-of-year. `MidMonth` (the 15th) is the default and sits inside every
/// month regardless of length; `FirstOfMonth` matches series whose
/// timestamps are stored as the first of the month. The value must match
/// whatever the model was trained with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DayOfYearConvention {
    /// Day 15 of the month.
    #[default]
    MidMonth,
    /// Day 1 of the month.
    FirstOfMonth,
}

impl DayOfYearConvention {
    pub fn day(&self) -> u32 {
        match self {
            DayOfYearConvention::MidMonth => 15,
            DayOfYearConvention::FirstOfMonth => 1,
        }
    }
}

/// Calendar part of a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub season: Season,
    /// 1-based ordinal of the representative day, leap-year aware.
    pub day_of_year: u32,
}

/// Derive season and day-of-year for `month`.
pub fn derive_calendar_features(
    month: CalendarMonth,
    convention: DayOfYearConvention,
) -> CalendarFeatures {
    // Days 1 and 15 exist in every CalendarMonth; the fallback keeps this total.
    let day_of_year = month
        .to_date(convention.day())
        .map(|d| d.ordinal())
        .unwrap_or_else(|| cumulative_days(month) + convention.day());

    CalendarFeatures {
        season: Season::from_month(month.month()),
        day_of_year,
    }
}

fn cumulative_days(month: CalendarMonth) -> u32 {
    const DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    DAYS[..(month.month() - 1) as usize].iter().sum()
}
