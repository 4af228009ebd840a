//! Per-step model input.

use crate::core::CalendarMonth;
use crate::features::calendar::{derive_calendar_features, DayOfYearConvention, Season};
use crate::transform::LagFeatures;
use serde::Serialize;

/// Number of numeric columns produced by [`FeatureVector::to_array`].
pub const FEATURE_COUNT: usize = 6;

/// Column names matching [`FeatureVector::to_array`] order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "season",
    "year",
    "month_num",
    "day_of_year",
    "lag_value",
    "rolling_mean",
];

/// Features for scoring one forecast month.
///
/// Built fresh for every step and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    entity_id: String,
    season: Season,
    year: i32,
    month_num: u32,
    day_of_year: u32,
    lag_value: f64,
    rolling_mean: f64,
}

impl FeatureVector {
    /// Combine the calendar features of `month` with the autoregressive state.
    pub fn build(
        entity_id: &str,
        month: CalendarMonth,
        convention: DayOfYearConvention,
        lags: LagFeatures,
    ) -> Self {
        let calendar = derive_calendar_features(month, convention);
        Self {
            entity_id: entity_id.to_string(),
            season: calendar.season,
            year: month.year(),
            month_num: month.month(),
            day_of_year: calendar.day_of_year,
            lag_value: lags.lag_value,
            rolling_mean: lags.rolling_mean,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_num(&self) -> u32 {
        self.month_num
    }

    pub fn day_of_year(&self) -> u32 {
        self.day_of_year
    }

    pub fn lag_value(&self) -> f64 {
        self.lag_value
    }

    pub fn rolling_mean(&self) -> f64 {
        self.rolling_mean
    }

    /// Numeric columns in [`FEATURE_NAMES`] order. The entity id is
    /// categorical and left to the predictor.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.season.code() as f64,
            self.year as f64,
            self.month_num as f64,
            self.day_of_year as f64,
            self.lag_value,
            self.rolling_mean,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_combines_calendar_and_lags() {
        let month = CalendarMonth::new(2024, 1).unwrap();
        let lags = LagFeatures {
            lag_value: 11.0,
            rolling_mean: 11.0,
        };
        let v = FeatureVector::build("Berlin", month, DayOfYearConvention::MidMonth, lags);

        assert_eq!(v.entity_id(), "Berlin");
        assert_eq!(v.season(), Season::Winter);
        assert_eq!(v.year(), 2024);
        assert_eq!(v.month_num(), 1);
        assert_eq!(v.day_of_year(), 15);
        assert_eq!(v.to_array(), [1.0, 2024.0, 1.0, 15.0, 11.0, 11.0]);
    }

    #[test]
    fn names_line_up_with_columns() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[4], "lag_value");
    }
}
