//! A single entity's forecast run as an explicit state machine.

use crate::core::{
    ensure_ascending, values_of, CalendarMonth, ForecastOutcome, ForecastResult, ForecastStatus,
    TimeSeriesPoint,
};
use crate::engine::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::features::{DayOfYearConvention, FeatureVector};
use crate::models::Predictor;
use crate::transform::RollingState;
use tracing::trace;

/// Phase of a seeded forecast run.
///
/// Seeding happens in [`ForecastRun::seed`]; a run that exists has a
/// window and starts in `Stepping` (or `Done` for a zero horizon).
/// `Failed` is reachable from stepping, `Cancelled` between steps.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// About to run step `step` (1-based).
    Stepping { step: usize },
    Done,
    Failed(ForecastError),
    Cancelled,
}

/// Exclusive state of one autoregressive run.
///
/// Holds the rolling state, the calendar position of the last known or
/// predicted month, and the results so far. Each [`step`](Self::step)
/// scores the next month and feeds the prediction back into the window.
#[derive(Debug, Clone)]
pub struct ForecastRun {
    entity_id: String,
    state: RollingState,
    position: CalendarMonth,
    convention: DayOfYearConvention,
    horizon: usize,
    results: Vec<ForecastResult>,
    phase: EngineState,
}

impl ForecastRun {
    /// Seed a run from `history` (ascending by month).
    ///
    /// The last `config.window_size` values fill the window and the month
    /// of the last point is the starting calendar position. A horizon that
    /// would run past [`CalendarMonth::max_value`] is `InvalidHorizon`.
    pub fn seed(
        entity_id: &str,
        history: &[TimeSeriesPoint],
        horizon: usize,
        config: &ForecastConfig,
    ) -> Result<Self> {
        ensure_ascending(history)?;
        let state = RollingState::init(&values_of(history), config.window_size)?;
        let position = history
            .last()
            .map(|p| p.timestamp())
            .ok_or(ForecastError::InsufficientHistory {
                needed: config.window_size,
                got: 0,
            })?;

        let fits = i64::try_from(horizon)
            .ok()
            .and_then(|h| position.checked_add_months(h))
            .is_some();
        if !fits {
            return Err(ForecastError::InvalidHorizon(format!(
                "{horizon} months after {position} is past the last supported month"
            )));
        }

        let phase = if horizon == 0 {
            EngineState::Done
        } else {
            EngineState::Stepping { step: 1 }
        };

        Ok(Self {
            entity_id: entity_id.to_string(),
            state,
            position,
            convention: config.day_of_year,
            horizon,
            results: Vec::with_capacity(horizon),
            phase,
        })
    }

    pub fn phase(&self) -> &EngineState {
        &self.phase
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.phase, EngineState::Stepping { .. })
    }

    pub fn rolling_state(&self) -> &RollingState {
        &self.state
    }

    pub fn results(&self) -> &[ForecastResult] {
        &self.results
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Month the next step will forecast, `None` once the run has stopped.
    pub fn next_month(&self) -> Option<CalendarMonth> {
        if self.is_stepping() {
            self.position.succ_opt()
        } else {
            None
        }
    }

    /// Features the next step will score, `None` once the run has stopped.
    pub fn next_features(&self) -> Option<FeatureVector> {
        self.next_month().map(|month| self.features_for(month))
    }

    fn features_for(&self, month: CalendarMonth) -> FeatureVector {
        FeatureVector::build(
            &self.entity_id,
            month,
            self.convention,
            self.state.current_features(),
        )
    }

    /// Run one step and return its prediction.
    ///
    /// A predictor error or a non-finite prediction moves the run to
    /// `Failed(ModelError)`; results already produced are kept and the
    /// rolling state is left untouched.
    pub fn step<P: Predictor + ?Sized>(&mut self, predictor: &P) -> Result<f64> {
        let step = match self.phase {
            EngineState::Stepping { step } => step,
            ref other => {
                return Err(ForecastError::InvalidParameter(format!(
                    "cannot step a run in state {other:?}"
                )))
            }
        };

        let month = self.position.succ_opt().ok_or_else(|| {
            ForecastError::InvalidHorizon(format!("no month after {}", self.position))
        })?;
        let features = self.features_for(month);

        let predicted = match predictor.predict(&features) {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                return Err(self.fail(ForecastError::ModelError(format!(
                    "{} returned non-finite prediction {v} for {month}",
                    predictor.name()
                ))))
            }
            Err(err @ ForecastError::ModelError(_)) => return Err(self.fail(err)),
            Err(err) => {
                return Err(self.fail(ForecastError::ModelError(format!(
                    "{}: {err}",
                    predictor.name()
                ))))
            }
        };

        trace!(
            entity = %self.entity_id,
            step,
            month = %month,
            lag_value = features.lag_value(),
            rolling_mean = features.rolling_mean(),
            predicted,
            "forecast step"
        );

        self.results
            .push(ForecastResult::new(self.entity_id.as_str(), month, predicted));
        self.state.advance(predicted);
        self.position = month;
        self.phase = if step >= self.horizon {
            EngineState::Done
        } else {
            EngineState::Stepping { step: step + 1 }
        };
        Ok(predicted)
    }

    /// Stop a stepping run. No effect once the run has finished.
    pub fn cancel(&mut self) {
        if self.is_stepping() {
            self.phase = EngineState::Cancelled;
        }
    }

    /// Convert into the finished outcome.
    ///
    /// A run finished while still stepping is `Incomplete`, not cancelled.
    pub fn finish(self) -> ForecastOutcome {
        let completed_steps = self.results.len();
        let status = match self.phase {
            EngineState::Done => ForecastStatus::Completed,
            EngineState::Failed(err) => ForecastStatus::Failed(err),
            EngineState::Cancelled => ForecastStatus::Cancelled { completed_steps },
            EngineState::Stepping { .. } => ForecastStatus::Incomplete { completed_steps },
        };
        ForecastOutcome::new(self.entity_id, self.results, status)
    }

    fn fail(&mut self, err: ForecastError) -> ForecastError {
        self.phase = EngineState::Failed(err.clone());
        err
    }
}
