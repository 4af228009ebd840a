//! In-memory history keyed by entity.

use crate::core::{ensure_ascending, CalendarMonth, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::history::HistoryProvider;
use std::collections::HashMap;

/// History held in memory, one ascending series per entity.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    series: HashMap<String, Vec<TimeSeriesPoint>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series for `entity_id`.
    ///
    /// Observations may arrive in any order; they are sorted by month.
    /// Duplicate months and non-finite values are rejected.
    pub fn insert_series(
        &mut self,
        entity_id: impl Into<String>,
        observations: impl IntoIterator<Item = (CalendarMonth, f64)>,
    ) -> Result<()> {
        let entity_id = entity_id.into();
        let mut points: Vec<TimeSeriesPoint> = observations
            .into_iter()
            .map(|(month, value)| TimeSeriesPoint::new(entity_id.clone(), month, value))
            .collect();

        if let Some(index) = points.iter().position(|p| !p.value().is_finite()) {
            return Err(ForecastError::NonFiniteValue { index });
        }

        points.sort_by_key(|p| p.timestamp());
        ensure_ascending(&points)?;
        self.series.insert(entity_id, points);
        Ok(())
    }

    /// Add one observation, keeping the entity's series ordered.
    pub fn push(&mut self, point: TimeSeriesPoint) -> Result<()> {
        if !point.value().is_finite() {
            return Err(ForecastError::NonFiniteValue { index: 0 });
        }

        let series = self.series.entry(point.entity_id().to_string()).or_default();
        match series.binary_search_by_key(&point.timestamp(), |p| p.timestamp()) {
            Ok(index) => Err(ForecastError::UnorderedHistory {
                index,
                detail: format!(
                    "duplicate month {} for '{}'",
                    point.timestamp(),
                    point.entity_id()
                ),
            }),
            Err(index) => {
                series.insert(index, point);
                Ok(())
            }
        }
    }

    /// Known entity ids, sorted.
    pub fn entities(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.series.keys().map(|k| k.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Full series for an entity.
    pub fn series(&self, entity_id: &str) -> Option<&[TimeSeriesPoint]> {
        self.series.get(entity_id).map(|s| s.as_slice())
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl HistoryProvider for InMemoryHistory {
    /// The most recent `min_points` points, or the whole series when it is
    /// shorter or `min_points` is zero. An entity with no observations has
    /// an empty history.
    fn get_history(&self, entity_id: &str, min_points: usize) -> Result<Vec<TimeSeriesPoint>> {
        let Some(series) = self.series.get(entity_id) else {
            return Ok(Vec::new());
        };

        let start = if min_points == 0 {
            0
        } else {
            series.len().saturating_sub(min_points)
        };
        Ok(series[start..].to_vec())
    }
}
