//! Rolling window state for autoregressive forecasting.
//!
//! [`RollingState`] holds the memory of one forecast run: the trailing
//! window of the most recent values, the last value and the window mean.
//! Predictions are fed back through [`RollingState::advance`] exactly as if
//! they were observations.

use crate::error::{ForecastError, Result};
use std::collections::VecDeque;

/// Lag part of a feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagFeatures {
    /// Most recent known or predicted value.
    pub lag_value: f64,
    /// Mean of the trailing window.
    pub rolling_mean: f64,
}

/// Autoregressive memory for a single entity's run.
///
/// After [`init`](Self::init) the window always holds exactly
/// `window_size` values and `rolling_mean` is their arithmetic mean.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingState {
    window: VecDeque<f64>,
    window_size: usize,
    last_value: f64,
    rolling_mean: f64,
    steps_advanced: usize,
}

impl RollingState {
    /// Seed from `history` (oldest first), keeping its last `window_size` values.
    pub fn init(history: &[f64], window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(ForecastError::InvalidParameter(
                "window_size must be positive".to_string(),
            ));
        }
        if history.len() < window_size {
            return Err(ForecastError::InsufficientHistory {
                needed: window_size,
                got: history.len(),
            });
        }

        let offset = history.len() - window_size;
        let tail = &history[offset..];
        if let Some(pos) = tail.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::NonFiniteValue {
                index: offset + pos,
            });
        }

        let window: VecDeque<f64> = tail.iter().copied().collect();
        let rolling_mean = mean(&window);
        Ok(Self {
            last_value: tail[window_size - 1],
            window,
            window_size,
            rolling_mean,
            steps_advanced: 0,
        })
    }

    /// Features for the next step.
    pub fn current_features(&self) -> LagFeatures {
        LagFeatures {
            lag_value: self.last_value,
            rolling_mean: self.rolling_mean,
        }
    }

    /// Push `new_value`, evicting the oldest value once the window is full.
    pub fn advance(&mut self, new_value: f64) {
        if self.window.len() == self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(new_value);
        self.last_value = new_value;
        // Exact mean of the window, not a running sum.
        self.rolling_mean = mean(&self.window);
        self.steps_advanced += 1;
    }

    pub fn window(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }

    /// Window contents, oldest first.
    pub fn window_values(&self) -> Vec<f64> {
        self.window.iter().copied().collect()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn last_value(&self) -> f64 {
        self.last_value
    }

    pub fn rolling_mean(&self) -> f64 {
        self.rolling_mean
    }

    /// Number of `advance` calls since seeding.
    pub fn steps_advanced(&self) -> usize {
        self.steps_advanced
    }
}

fn mean(values: &VecDeque<f64>) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Compute trailing rolling mean over a slice.
///
/// Positions with fewer than `window` preceding values (inclusive) are NaN.
pub fn rolling_mean(series: &[f64], window: usize) -> Vec<f64> {
    if series.is_empty() || window == 0 {
        return vec![f64::NAN; series.len()];
    }

    let mut result = vec![f64::NAN; series.len()];
    for i in (window - 1)..series.len() {
        let segment = &series[i + 1 - window..=i];
        result[i] = segment.iter().sum::<f64>() / window as f64;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn init_uses_most_recent_values() {
        let state = RollingState::init(&[1.0, 10.0, 12.0, 11.0], 3).unwrap();
        assert_eq!(state.window_values(), vec![10.0, 12.0, 11.0]);
        assert_eq!(state.last_value(), 11.0);
        assert_relative_eq!(state.rolling_mean(), 11.0);
        assert_eq!(state.steps_advanced(), 0);
    }

    #[test]
    fn init_rejects_short_history() {
        assert_eq!(
            RollingState::init(&[1.0, 2.0], 3),
            Err(ForecastError::InsufficientHistory { needed: 3, got: 2 })
        );
    }

    #[test]
    fn init_rejects_zero_window() {
        assert!(matches!(
            RollingState::init(&[1.0], 0),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn init_rejects_nan_inside_window_only() {
        // NaN outside the retained tail is irrelevant.
        assert!(RollingState::init(&[f64::NAN, 1.0, 2.0], 2).is_ok());
        assert_eq!(
            RollingState::init(&[0.0, f64::NAN, 2.0], 2),
            Err(ForecastError::NonFiniteValue { index: 1 })
        );
    }

    #[test]
    fn advance_evicts_oldest_and_recomputes_mean() {
        let mut state = RollingState::init(&[10.0, 12.0, 11.0], 3).unwrap();
        state.advance(12.0);

        assert_eq!(state.window_values(), vec![12.0, 11.0, 12.0]);
        assert_eq!(state.last_value(), 12.0);
        assert_relative_eq!(state.rolling_mean(), 35.0 / 3.0, epsilon = 1e-12);

        let f = state.current_features();
        assert_eq!(f.lag_value, 12.0);
        assert_relative_eq!(f.rolling_mean, 35.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn window_length_is_stable_across_many_steps() {
        let mut state = RollingState::init(&[1.0, 2.0, 3.0, 4.0], 4).unwrap();
        for i in 0..50 {
            state.advance(i as f64 * 0.5);
            assert_eq!(state.window().count(), 4);
            let expected: f64 = state.window().sum::<f64>() / 4.0;
            assert_relative_eq!(state.rolling_mean(), expected, epsilon = 1e-12);
        }
        assert_eq!(state.steps_advanced(), 50);
    }

    #[test]
    fn window_of_one_tracks_last_value() {
        let mut state = RollingState::init(&[5.0], 1).unwrap();
        state.advance(7.5);
        assert_eq!(state.rolling_mean(), 7.5);
        assert_eq!(state.last_value(), 7.5);
    }

    #[test]
    fn test_rolling_mean() {
        let series = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = rolling_mean(&series, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_relative_eq!(result[2], 2.0, epsilon = 1e-10);
        assert_relative_eq!(result[3], 3.0, epsilon = 1e-10);
        assert_relative_eq!(result[4], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn rolling_mean_matches_state_after_feeding_series() {
        let series = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let reference = rolling_mean(&series, 3);

        let mut state = RollingState::init(&series[..3], 3).unwrap();
        for (i, &v) in series.iter().enumerate().skip(3) {
            state.advance(v);
            assert_relative_eq!(state.rolling_mean(), reference[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn rolling_mean_empty_or_zero_window() {
        assert!(rolling_mean(&[], 3).is_empty());
        assert!(rolling_mean(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
