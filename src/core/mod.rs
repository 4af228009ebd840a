//! Core data structures for monthly entity forecasting.

mod calendar;
mod forecast;
mod time_series;

pub use calendar::CalendarMonth;
pub use forecast::{ForecastOutcome, ForecastStatus, PartialForecast};
pub use time_series::{ensure_ascending, values_of, ForecastResult, TimeSeriesPoint};
