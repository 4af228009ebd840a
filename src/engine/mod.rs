//! Autoregressive multi-step forecast engine.
//!
//! The engine turns a single-step [`Predictor`] into an N-months-ahead
//! forecaster for one entity: it seeds a [`RollingState`] from the
//! entity's history, then repeatedly derives calendar features, scores
//! them and feeds the prediction back as the newest value.
//!
//! # Example
//!
//! ```
//! use anofox_autoregress::core::CalendarMonth;
//! use anofox_autoregress::engine::ForecastEngine;
//! use anofox_autoregress::history::InMemoryHistory;
//! use anofox_autoregress::models::FnPredictor;
//!
//! let mut history = InMemoryHistory::new();
//! let start = CalendarMonth::new(2023, 10).unwrap();
//! let months = [start, start.succ_opt().unwrap(), start.checked_add_months(2).unwrap()];
//! history
//!     .insert_series("Paris", months.into_iter().zip([10.0, 12.0, 11.0]))
//!     .unwrap();
//!
//! let predictor = FnPredictor::new("lag+1", |f| Ok(f.lag_value() + 1.0));
//! let engine = ForecastEngine::new(predictor, history);
//!
//! let outcome = engine.forecast("Paris", 2);
//! assert!(outcome.is_completed());
//! assert_eq!(outcome.values(), vec![12.0, 13.0]);
//! assert_eq!(outcome.results()[0].timestamp(), CalendarMonth::new(2024, 1).unwrap());
//! ```
//!
//! [`RollingState`]: crate::transform::RollingState

mod batch;
mod cancel;
mod config;
mod run;

pub use cancel::CancellationToken;
pub use config::{ForecastConfig, Horizon, DEFAULT_MAX_HORIZON, DEFAULT_WINDOW_SIZE};
pub use run::{EngineState, ForecastRun};

use crate::core::{ForecastOutcome, ForecastStatus};
use crate::error::{ForecastError, Result};
use crate::history::HistoryProvider;
use crate::models::Predictor;
use tracing::{debug, instrument, warn};

/// Orchestrates forecast runs over a predictor and a history source.
///
/// The engine itself holds no per-run state; every call to
/// [`forecast`](Self::forecast) owns a fresh [`ForecastRun`].
#[derive(Debug, Clone)]
pub struct ForecastEngine<P, H> {
    predictor: P,
    history: H,
    config: ForecastConfig,
}

impl<P, H> ForecastEngine<P, H>
where
    P: Predictor,
    H: HistoryProvider,
{
    /// Create an engine with the default configuration (window of 3).
    pub fn new(predictor: P, history: H) -> Self {
        Self {
            predictor,
            history,
            config: ForecastConfig::default(),
        }
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(predictor: P, history: H, config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            predictor,
            history,
            config,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Forecast `horizon` months past the entity's last observation.
    pub fn forecast(&self, entity_id: &str, horizon: usize) -> ForecastOutcome {
        self.forecast_with_cancel(entity_id, horizon, &CancellationToken::new())
    }

    /// Like [`forecast`](Self::forecast), checking `cancel` before each step.
    #[instrument(
        level = "debug",
        skip(self, cancel),
        fields(window_size = self.config.window_size, model = self.predictor.name())
    )]
    pub fn forecast_with_cancel(
        &self,
        entity_id: &str,
        horizon: usize,
        cancel: &CancellationToken,
    ) -> ForecastOutcome {
        if let Err(err) = self.config.check_horizon(horizon) {
            warn!(error = %err, "rejected horizon");
            return ForecastOutcome::new(entity_id, Vec::new(), ForecastStatus::Failed(err));
        }
        if horizon == 0 {
            return ForecastOutcome::new(entity_id, Vec::new(), ForecastStatus::Completed);
        }

        let mut run = match self.seed(entity_id, horizon) {
            Ok(run) => run,
            Err(err) => {
                warn!(error = %err, "seeding failed");
                return ForecastOutcome::new(entity_id, Vec::new(), ForecastStatus::Failed(err));
            }
        };

        while run.is_stepping() {
            if cancel.is_cancelled() {
                run.cancel();
                break;
            }
            if let Err(err) = run.step(&self.predictor) {
                warn!(error = %err, completed = run.results().len(), "prediction failed");
                break;
            }
        }

        let outcome = run.finish();
        match outcome.status() {
            ForecastStatus::Cancelled { completed_steps } => {
                warn!(completed_steps, "forecast cancelled")
            }
            status => debug!(steps = outcome.len(), %status, "forecast finished"),
        }
        outcome
    }

    /// Seed a run without stepping it, for callers that drive the steps.
    ///
    /// A provider that reports `UnknownEntity` is treated as having no
    /// history for it, so seeding fails with `InsufficientHistory`.
    pub fn seed(&self, entity_id: &str, horizon: usize) -> Result<ForecastRun> {
        self.config.check_horizon(horizon)?;
        let points = match self.history.get_history(entity_id, self.config.window_size) {
            Err(ForecastError::UnknownEntity(_)) => Vec::new(),
            other => other?,
        };
        debug!(points = points.len(), "seeding from history");
        ForecastRun::seed(entity_id, &points, horizon, &self.config)
    }
}
