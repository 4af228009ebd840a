//! Scoring backends consumed by the forecast engine.

mod traits;

pub mod linear;

pub use linear::LinearPredictor;
pub use traits::{BoxedPredictor, FnPredictor, Predictor, PredictorMut, Serialized};
