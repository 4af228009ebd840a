//! Finished forecast runs: results plus terminal status.

use crate::core::ForecastResult;
use crate::error::ForecastError;
use std::fmt;

/// How a forecast run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastStatus {
    /// Every requested step produced a result.
    Completed,
    /// The run stopped on an error. Results produced before it are kept.
    Failed(ForecastError),
    /// Cancellation was observed between steps.
    Cancelled { completed_steps: usize },
    /// A manually driven run was finished before its last step.
    Incomplete { completed_steps: usize },
}

impl ForecastStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ForecastStatus::Completed)
    }

    pub fn error(&self) -> Option<&ForecastError> {
        match self {
            ForecastStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ForecastStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastStatus::Completed => write!(f, "completed"),
            ForecastStatus::Failed(err) => write!(f, "failed: {err}"),
            ForecastStatus::Cancelled { completed_steps } => {
                write!(f, "cancelled after {completed_steps} steps")
            }
            ForecastStatus::Incomplete { completed_steps } => {
                write!(f, "stopped after {completed_steps} steps")
            }
        }
    }
}

/// Ordered results of one entity's run together with its status.
///
/// Partial success is explicit: a failed or cancelled run still carries
/// the prefix of results produced before it stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    entity_id: String,
    results: Vec<ForecastResult>,
    status: ForecastStatus,
}

impl ForecastOutcome {
    pub(crate) fn new(
        entity_id: impl Into<String>,
        results: Vec<ForecastResult>,
        status: ForecastStatus,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            results,
            status,
        }
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn results(&self) -> &[ForecastResult] {
        &self.results
    }

    pub fn status(&self) -> &ForecastStatus {
        &self.status
    }

    /// Number of forecast steps actually produced.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Predicted values in step order.
    pub fn values(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.predicted_value()).collect()
    }

    /// Split into the results and the status.
    pub fn into_parts(self) -> (Vec<ForecastResult>, ForecastStatus) {
        (self.results, self.status)
    }

    /// `Ok(results)` for a completed run, otherwise the partial forecast as an error.
    pub fn into_result(self) -> std::result::Result<Vec<ForecastResult>, PartialForecast> {
        match self.status {
            ForecastStatus::Completed => Ok(self.results),
            status => Err(PartialForecast {
                results: self.results,
                status,
            }),
        }
    }
}

/// Results of a run that did not complete.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialForecast {
    pub results: Vec<ForecastResult>,
    pub status: ForecastStatus,
}

impl fmt::Display for PartialForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "forecast {} with {} result(s)",
            self.status,
            self.results.len()
        )
    }
}

impl std::error::Error for PartialForecast {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.status {
            ForecastStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalendarMonth;

    fn results(n: u32) -> Vec<ForecastResult> {
        (1..=n)
            .map(|m| ForecastResult::new("Oslo", CalendarMonth::new(2024, m).unwrap(), m as f64))
            .collect()
    }

    #[test]
    fn completed_outcome_converts_to_ok() {
        let outcome = ForecastOutcome::new("Oslo", results(3), ForecastStatus::Completed);
        assert!(outcome.is_completed());
        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(outcome.into_result().unwrap().len(), 3);
    }

    #[test]
    fn failed_outcome_keeps_prefix() {
        let err = ForecastError::ModelError("timeout".to_string());
        let outcome = ForecastOutcome::new("Oslo", results(2), ForecastStatus::Failed(err.clone()));
        assert_eq!(outcome.status().error(), Some(&err));

        let partial = outcome.into_result().unwrap_err();
        assert_eq!(partial.results.len(), 2);
        assert_eq!(
            partial.to_string(),
            "forecast failed: model error: timeout with 2 result(s)"
        );
        assert!(std::error::Error::source(&partial).is_some());
    }

    #[test]
    fn cancelled_status_displays_step_count() {
        let status = ForecastStatus::Cancelled { completed_steps: 4 };
        assert_eq!(status.to_string(), "cancelled after 4 steps");
        assert!(status.error().is_none());
        assert!(!status.is_completed());
    }

    #[test]
    fn into_parts_returns_prefix_and_status() {
        let status = ForecastStatus::Incomplete { completed_steps: 2 };
        let outcome = ForecastOutcome::new("Oslo", results(2), status.clone());
        assert_eq!(outcome.entity_id(), "Oslo");

        let (results, got) = outcome.into_parts();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].timestamp(), CalendarMonth::new(2024, 2).unwrap());
        assert_eq!(got, status);
        assert_eq!(got.to_string(), "stopped after 2 steps");
        assert!(got.error().is_none());
    }
}
