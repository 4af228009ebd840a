//! Observed and forecast points of a monthly entity series.

use crate::core::CalendarMonth;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// A single observation for one entity at month granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    entity_id: String,
    timestamp: CalendarMonth,
    value: f64,
}

impl TimeSeriesPoint {
    pub fn new(entity_id: impl Into<String>, timestamp: CalendarMonth, value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            value,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn timestamp(&self) -> CalendarMonth {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// One step of a finished forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    entity_id: String,
    timestamp: CalendarMonth,
    predicted_value: f64,
}

impl ForecastResult {
    pub fn new(entity_id: impl Into<String>, timestamp: CalendarMonth, predicted_value: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            timestamp,
            predicted_value,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn timestamp(&self) -> CalendarMonth {
        self.timestamp
    }

    pub fn predicted_value(&self) -> f64 {
        self.predicted_value
    }
}

/// Check that `points` are strictly ascending by month.
///
/// Gaps are allowed (a month with no observation is simply absent);
/// repeated or backwards months are not.
pub fn ensure_ascending(points: &[TimeSeriesPoint]) -> Result<()> {
    for (i, pair) in points.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(ForecastError::UnorderedHistory {
                index: i + 1,
                detail: format!("{} does not follow {}", pair[1].timestamp, pair[0].timestamp),
            });
        }
    }
    Ok(())
}

/// Values of `points`, oldest first.
pub fn values_of(points: &[TimeSeriesPoint]) -> Vec<f64> {
    points.iter().map(|p| p.value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(month: u32, value: f64) -> TimeSeriesPoint {
        TimeSeriesPoint::new("Paris", CalendarMonth::new(2022, month).unwrap(), value)
    }

    #[test]
    fn ascending_points_pass() {
        let points = vec![point(1, 30.0), point(2, 31.5), point(4, 28.0)];
        assert!(ensure_ascending(&points).is_ok());
        assert_eq!(values_of(&points), vec![30.0, 31.5, 28.0]);
    }

    #[test]
    fn repeated_month_is_rejected() {
        let points = vec![point(1, 30.0), point(2, 31.5), point(2, 28.0)];
        match ensure_ascending(&points) {
            Err(ForecastError::UnorderedHistory { index, .. }) => assert_eq!(index, 2),
            other => panic!("expected UnorderedHistory, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_single_point_series_are_ordered() {
        assert!(ensure_ascending(&[]).is_ok());
        assert!(ensure_ascending(&[point(5, 1.0)]).is_ok());
    }

    #[test]
    fn accessors_expose_fields() {
        let r = ForecastResult::new("Rome", CalendarMonth::new(2025, 1).unwrap(), 42.0);
        assert_eq!(r.entity_id(), "Rome");
        assert_eq!(r.timestamp().month(), 1);
        assert_eq!(r.predicted_value(), 42.0);
    }
}
