//! State transforms applied between forecast steps.

pub mod window;

pub use window::{rolling_mean, LagFeatures, RollingState};
