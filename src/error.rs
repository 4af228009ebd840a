//! Error types for the anofox-autoregress library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while seeding or stepping a forecast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Fewer historical points than the rolling window needs.
    #[error("insufficient history: need at least {needed}, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    /// Horizon was negative, fractional, non-finite or above the configured limit.
    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),

    /// The predictor failed to score a feature vector.
    #[error("model error: {0}")]
    ModelError(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Month number outside 1..=12.
    #[error("invalid month: {month} (expected 1..=12)")]
    InvalidMonth { month: u32 },

    /// The history provider has no series for the entity.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// History points were not strictly ascending by month.
    #[error("history out of order at index {index}: {detail}")]
    UnorderedHistory { index: usize, detail: String },

    /// NaN or infinite value where a finite observation is required.
    #[error("non-finite value at index {index}")]
    NonFiniteValue { index: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Malformed input while reading history.
    #[error("parse error: {0}")]
    Parse(String),

    /// A history source could not be opened or read.
    #[error("i/o error: {0}")]
    Io(String),
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::Parse(err.to_string())
    }
}
