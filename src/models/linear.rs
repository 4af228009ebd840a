//! In-process linear scoring backend.
//!
//! Scores `intercept + Σ coefficient_i · feature_i` over
//! [`FeatureVector::to_array`], plus an optional per-entity offset standing
//! in for the categorical entity term of the trained model.

use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::models::Predictor;
use std::collections::HashMap;

/// Linear regression predictor with fixed, externally trained weights.
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    intercept: f64,
    coefficients: [f64; FEATURE_COUNT],
    entity_offsets: HashMap<String, f64>,
    strict_entities: bool,
}

impl LinearPredictor {
    /// Create from an intercept and one coefficient per feature column,
    /// in [`FEATURE_NAMES`] order.
    pub fn new(intercept: f64, coefficients: &[f64]) -> Result<Self> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(ForecastError::DimensionMismatch {
                expected: FEATURE_COUNT,
                got: coefficients.len(),
            });
        }
        if !intercept.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "intercept must be finite".to_string(),
            ));
        }
        if let Some(pos) = coefficients.iter().position(|c| !c.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "coefficient for '{}' must be finite",
                FEATURE_NAMES[pos]
            )));
        }

        let mut weights = [0.0; FEATURE_COUNT];
        weights.copy_from_slice(coefficients);
        Ok(Self {
            intercept,
            coefficients: weights,
            entity_offsets: HashMap::new(),
            strict_entities: false,
        })
    }

    /// Add a constant offset applied to one entity's predictions.
    pub fn with_entity_offset(mut self, entity_id: impl Into<String>, offset: f64) -> Self {
        self.entity_offsets.insert(entity_id.into(), offset);
        self
    }

    /// Reject entities without an offset instead of scoring them with zero.
    pub fn strict_entities(mut self, strict: bool) -> Self {
        self.strict_entities = strict;
        self
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn entity_offset(&self, entity_id: &str) -> Result<f64> {
        match self.entity_offsets.get(entity_id) {
            Some(&offset) => Ok(offset),
            None if self.strict_entities => Err(ForecastError::ModelError(format!(
                "entity '{entity_id}' was not seen during training"
            ))),
            None => Ok(0.0),
        }
    }
}

impl Predictor for LinearPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let offset = self.entity_offset(features.entity_id())?;
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.to_array())
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.intercept + offset + dot)
    }

    fn name(&self) -> &str {
        "LinearPredictor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalendarMonth;
    use crate::features::DayOfYearConvention;
    use crate::transform::LagFeatures;
    use approx::assert_relative_eq;

    fn features(entity: &str) -> FeatureVector {
        FeatureVector::build(
            entity,
            CalendarMonth::new(2024, 7).unwrap(),
            DayOfYearConvention::MidMonth,
            LagFeatures {
                lag_value: 20.0,
                rolling_mean: 18.0,
            },
        )
    }

    #[test]
    fn scores_weighted_sum() {
        // 0.5 * lag + 0.5 * rolling_mean + 1
        let model = LinearPredictor::new(1.0, &[0.0, 0.0, 0.0, 0.0, 0.5, 0.5]).unwrap();
        assert_relative_eq!(model.predict(&features("Vienna")).unwrap(), 20.0);
    }

    #[test]
    fn season_and_calendar_terms_contribute() {
        let model = LinearPredictor::new(0.0, &[2.0, 0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
        // summer code 3, July = 7
        assert_relative_eq!(model.predict(&features("Vienna")).unwrap(), 13.0);
    }

    #[test]
    fn wrong_coefficient_count_is_rejected() {
        let err = LinearPredictor::new(0.0, &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            ForecastError::DimensionMismatch {
                expected: FEATURE_COUNT,
                got: 2
            }
        );
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        assert!(LinearPredictor::new(f64::NAN, &[0.0; 6]).is_err());
        assert!(LinearPredictor::new(0.0, &[0.0, 0.0, 0.0, 0.0, f64::INFINITY, 0.0]).is_err());
    }

    #[test]
    fn entity_offsets_and_strict_mode() {
        let model = LinearPredictor::new(0.0, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0])
            .unwrap()
            .with_entity_offset("Paris", 5.0);

        assert_relative_eq!(model.predict(&features("Paris")).unwrap(), 25.0);
        assert_relative_eq!(model.predict(&features("Lisbon")).unwrap(), 20.0);

        let strict = model.strict_entities(true);
        assert!(matches!(
            strict.predict(&features("Lisbon")),
            Err(ForecastError::ModelError(_))
        ));
    }
}
