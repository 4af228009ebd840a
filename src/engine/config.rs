//! Engine configuration and horizon validation.

use crate::error::{ForecastError, Result};
use crate::features::DayOfYearConvention;

/// Default trailing window length.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Default upper bound on the forecast horizon, in months.
pub const DEFAULT_MAX_HORIZON: usize = 120;

/// Forecast engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of trailing values in the rolling window
    pub window_size: usize,
    /// Representative day used for `day_of_year`
    pub day_of_year: DayOfYearConvention,
    /// Largest accepted horizon
    pub max_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            day_of_year: DayOfYearConvention::default(),
            max_horizon: DEFAULT_MAX_HORIZON,
        }
    }
}

impl ForecastConfig {
    /// Set the rolling window size.
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the day-of-year convention.
    pub fn day_of_year(mut self, convention: DayOfYearConvention) -> Self {
        self.day_of_year = convention;
        self
    }

    /// Set the maximum horizon.
    pub fn max_horizon(mut self, max_horizon: usize) -> Self {
        self.max_horizon = max_horizon;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "window_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject horizons above `max_horizon`.
    pub fn check_horizon(&self, horizon: usize) -> Result<()> {
        if horizon > self.max_horizon {
            return Err(ForecastError::InvalidHorizon(format!(
                "{horizon} exceeds maximum of {}",
                self.max_horizon
            )));
        }
        Ok(())
    }
}

/// A validated, non-negative whole number of forecast steps.
///
/// Use the `TryFrom` impls to validate horizons arriving as signed or
/// floating-point numbers (query strings, JSON, UI widgets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Horizon(usize);

impl Horizon {
    pub fn new(steps: usize) -> Self {
        Self(steps)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for Horizon {
    fn from(steps: usize) -> Self {
        Self(steps)
    }
}

impl From<Horizon> for usize {
    fn from(h: Horizon) -> Self {
        h.0
    }
}

impl TryFrom<i64> for Horizon {
    type Error = ForecastError;

    fn try_from(value: i64) -> Result<Self> {
        usize::try_from(value)
            .map(Self)
            .map_err(|_| ForecastError::InvalidHorizon(format!("{value} is negative")))
    }
}

impl TryFrom<f64> for Horizon {
    type Error = ForecastError;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(ForecastError::InvalidHorizon(format!("{value} is not finite")));
        }
        if value.fract() != 0.0 {
            return Err(ForecastError::InvalidHorizon(format!(
                "{value} is not a whole number"
            )));
        }
        if value < 0.0 {
            return Err(ForecastError::InvalidHorizon(format!("{value} is negative")));
        }
        if value > usize::MAX as f64 {
            return Err(ForecastError::InvalidHorizon(format!("{value} is too large")));
        }
        Ok(Self(value as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ForecastConfig::default();
        assert_eq!(config.window_size, 3);
        assert_eq!(config.day_of_year, DayOfYearConvention::MidMonth);
        assert_eq!(config.max_horizon, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn setters_chain() {
        let config = ForecastConfig::default()
            .window_size(6)
            .day_of_year(DayOfYearConvention::FirstOfMonth)
            .max_horizon(24);
        assert_eq!(config.window_size, 6);
        assert_eq!(config.day_of_year, DayOfYearConvention::FirstOfMonth);
        assert_eq!(config.max_horizon, 24);
    }

    #[test]
    fn zero_window_is_invalid() {
        assert!(matches!(
            ForecastConfig::default().window_size(0).validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn horizon_limit() {
        let config = ForecastConfig::default().max_horizon(12);
        assert!(config.check_horizon(0).is_ok());
        assert!(config.check_horizon(12).is_ok());
        assert!(matches!(
            config.check_horizon(13),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn horizon_from_signed() {
        assert_eq!(Horizon::try_from(6i64).unwrap().get(), 6);
        assert_eq!(Horizon::try_from(0i64).unwrap().get(), 0);
        assert_eq!(
            Horizon::try_from(-1i64),
            Err(ForecastError::InvalidHorizon("-1 is negative".to_string()))
        );
    }

    #[test]
    fn horizon_from_float() {
        assert_eq!(Horizon::try_from(3.0f64).unwrap(), Horizon::new(3));
        assert!(matches!(
            Horizon::try_from(2.5f64),
            Err(ForecastError::InvalidHorizon(_))
        ));
        assert!(matches!(
            Horizon::try_from(-2.0f64),
            Err(ForecastError::InvalidHorizon(_))
        ));
        assert!(matches!(
            Horizon::try_from(f64::NAN),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }
}
