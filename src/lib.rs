//! # anofox-autoregress
//!
//! Autoregressive multi-step forecasting for monthly, entity-keyed series.
//!
//! A single-step regression model (anything implementing
//! [`models::Predictor`]) is turned into an N-months-ahead forecaster:
//! calendar features are derived for each future month, the model is
//! scored, and every prediction is fed back into a trailing window as if
//! it had been observed. Runs for different entities are independent and
//! can be executed in parallel.

pub mod core;
pub mod engine;
pub mod error;
pub mod features;
pub mod history;
pub mod models;
pub mod transform;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{CalendarMonth, ForecastOutcome, ForecastResult, ForecastStatus};
    pub use crate::engine::{CancellationToken, ForecastConfig, ForecastEngine, Horizon};
    pub use crate::error::{ForecastError, Result};
    pub use crate::features::{DayOfYearConvention, FeatureVector, Season};
    pub use crate::history::{HistoryProvider, InMemoryHistory};
    pub use crate::models::{FnPredictor, LinearPredictor, Predictor};
}
