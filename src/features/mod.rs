//! Feature derivation for a single forecast step.

pub mod calendar;
pub mod vector;

pub use calendar::{derive_calendar_features, CalendarFeatures, DayOfYearConvention, Season};
pub use vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
