//! History providers that seed a forecast run.

mod csv_source;
mod memory;

pub use csv_source::CsvColumns;
pub use memory::InMemoryHistory;

use crate::core::TimeSeriesPoint;
use crate::error::Result;

/// Supplies the most recent observations for an entity.
///
/// Points are returned ascending by month. A provider may return fewer
/// than `min_points` when that is all it has; the engine reports the
/// shortfall as `InsufficientHistory`.
pub trait HistoryProvider {
    fn get_history(&self, entity_id: &str, min_points: usize) -> Result<Vec<TimeSeriesPoint>>;
}

impl<H: HistoryProvider + ?Sized> HistoryProvider for &H {
    fn get_history(&self, entity_id: &str, min_points: usize) -> Result<Vec<TimeSeriesPoint>> {
        (**self).get_history(entity_id, min_points)
    }
}

impl<H: HistoryProvider + ?Sized> HistoryProvider for std::sync::Arc<H> {
    fn get_history(&self, entity_id: &str, min_points: usize) -> Result<Vec<TimeSeriesPoint>> {
        (**self).get_history(entity_id, min_points)
    }
}
