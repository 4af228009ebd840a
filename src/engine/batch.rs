//! Independent forecast runs over many entities.

use crate::core::ForecastOutcome;
use crate::engine::{CancellationToken, ForecastEngine};
use crate::history::HistoryProvider;
use crate::models::Predictor;
use rayon::prelude::*;
use tracing::debug;

impl<P, H> ForecastEngine<P, H>
where
    P: Predictor + Sync,
    H: HistoryProvider + Sync,
{
    /// Forecast every entity in parallel.
    ///
    /// Each entity gets its own run and rolling state; nothing is shared
    /// between runs except the predictor and the history source. Outcomes
    /// are returned in the order of `entities`, whatever their status.
    pub fn forecast_batch<S>(&self, entities: &[S], horizon: usize) -> Vec<ForecastOutcome>
    where
        S: AsRef<str> + Sync,
    {
        self.forecast_batch_with_cancel(entities, horizon, &CancellationToken::new())
    }

    /// Like [`forecast_batch`](Self::forecast_batch) with one token shared by all runs.
    pub fn forecast_batch_with_cancel<S>(
        &self,
        entities: &[S],
        horizon: usize,
        cancel: &CancellationToken,
    ) -> Vec<ForecastOutcome>
    where
        S: AsRef<str> + Sync,
    {
        debug!(entities = entities.len(), horizon, "batch forecast");
        entities
            .par_iter()
            .map(|entity| self.forecast_with_cancel(entity.as_ref(), horizon, cancel))
            .collect()
    }
}
