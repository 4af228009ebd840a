//! Predictor traits: the narrow scoring interface the engine consumes.

use crate::error::{ForecastError, Result};
use crate::features::FeatureVector;
use std::sync::Mutex;

/// Single-step scoring function, feature vector in, prediction out.
///
/// Implementations must be callable through `&self`; a backend that needs
/// exclusive access while scoring implements [`PredictorMut`] and is
/// wrapped in [`Serialized`]. This trait is object-safe and can be used
/// with `Box<dyn Predictor>`.
pub trait Predictor {
    /// Score one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<f64>;

    /// Get the model name.
    fn name(&self) -> &str {
        "predictor"
    }
}

/// Scoring backend that mutates itself while predicting (caches, sessions,
/// connection handles).
pub trait PredictorMut {
    fn predict_mut(&mut self, features: &FeatureVector) -> Result<f64>;

    fn name(&self) -> &str {
        "predictor"
    }
}

/// Type alias for boxed predictor trait objects.
///
/// # Example
///
/// ```
/// use anofox_autoregress::models::{BoxedPredictor, FnPredictor, Predictor};
///
/// let model: BoxedPredictor = Box::new(FnPredictor::new("lag", |f| Ok(f.lag_value())));
/// assert_eq!(model.name(), "lag");
/// ```
pub type BoxedPredictor = Box<dyn Predictor + Send + Sync>;

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Predictor + ?Sized> Predictor for std::sync::Arc<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (**self).predict(features)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Predictor backed by a closure.
///
/// Handy for mocks and for adapting remote scoring clients.
pub struct FnPredictor<F> {
    name: String,
    f: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(&FeatureVector) -> Result<f64>,
{
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        (self.f)(features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnPredictor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnPredictor").field("name", &self.name).finish()
    }
}

/// Serializes access to a [`PredictorMut`] behind a mutex so that
/// concurrent entity runs can share it.
#[derive(Debug)]
pub struct Serialized<P> {
    name: String,
    inner: Mutex<P>,
}

impl<P: PredictorMut> Serialized<P> {
    pub fn new(inner: P) -> Self {
        Self {
            name: inner.name().to_string(),
            inner: Mutex::new(inner),
        }
    }

    /// Recover the wrapped backend.
    pub fn into_inner(self) -> Result<P> {
        self.inner
            .into_inner()
            .map_err(|_| ForecastError::ModelError(format!("{} lock poisoned", self.name)))
    }
}

impl<P: PredictorMut> Predictor for Serialized<P> {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| ForecastError::ModelError(format!("{} lock poisoned", self.name)))?;
        guard.predict_mut(features)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
