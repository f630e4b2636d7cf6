//! Concrete scaling and scoring implementations.
//!
//! `StandardScaler` mirrors the per-feature standardization fitted beside
//! the learned model. `LinearScorer` evaluates a model exported as plain
//! coefficients.

use glucose_spi::{
    FeatureScaler, FeatureSchema, FeatureVector, GlucoseError, ModelError, Result, Scorer,
};
use serde::{Deserialize, Serialize};

/// Per-feature zero-mean, unit-variance transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Build from already fitted parameters.
    ///
    /// A zero scale is replaced by 1 so constant features pass through centered.
    pub fn new(means: Vec<f64>, scales: Vec<f64>) -> Result<Self> {
        if means.len() != scales.len() {
            return Err(GlucoseError::InvalidParameter {
                name: "scales".to_string(),
                reason: format!("expected {} entries, got {}", means.len(), scales.len()),
            });
        }
        let scales = scales
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();
        Ok(Self { means, scales })
    }

    /// Fit means and population standard deviations column by column.
    pub fn fit(samples: &[FeatureVector]) -> Result<Self> {
        let first = samples.first().ok_or(GlucoseError::InsufficientData {
            required: 1,
            actual: 0,
        })?;
        let width = first.len();
        if let Some(bad) = samples.iter().find(|s| s.len() != width) {
            return Err(ModelError::SchemaMismatch {
                expected: width,
                actual: bad.len(),
            }
            .into());
        }

        let n = samples.len() as f64;
        let mut means = vec![0.0; width];
        for sample in samples {
            for (m, &x) in means.iter_mut().zip(sample.values()) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut variances = vec![0.0; width];
        for sample in samples {
            for ((v, &m), &x) in variances.iter_mut().zip(&means).zip(sample.values()) {
                *v += (x - m).powi(2);
            }
        }
        let scales = variances.into_iter().map(|v| (v / n).sqrt()).collect();

        Self::new(means, scales)
    }

    pub fn width(&self) -> usize {
        self.means.len()
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> std::result::Result<FeatureVector, ModelError> {
        if features.len() != self.width() {
            return Err(ModelError::SchemaMismatch {
                expected: self.width(),
                actual: features.len(),
            });
        }
        let scaled = features
            .values()
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect();
        Ok(FeatureVector::new(features.schema(), scaled))
    }
}

/// Pass-through scaler for models trained on raw features.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl FeatureScaler for IdentityScaler {
    fn transform(&self, features: &FeatureVector) -> std::result::Result<FeatureVector, ModelError> {
        Ok(features.clone())
    }
}

/// `intercept + weights · features`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearScorer {
    schema: FeatureSchema,
    weights: Vec<f64>,
    intercept: f64,
}

impl LinearScorer {
    pub fn new(schema: FeatureSchema, weights: Vec<f64>, intercept: f64) -> Result<Self> {
        if weights.len() != schema.width() {
            return Err(ModelError::SchemaMismatch {
                expected: schema.width(),
                actual: weights.len(),
            }
            .into());
        }
        Ok(Self {
            schema,
            weights,
            intercept,
        })
    }
}

impl Scorer for LinearScorer {
    fn schema(&self) -> FeatureSchema {
        self.schema
    }

    fn score(&self, features: &FeatureVector) -> std::result::Result<f64, ModelError> {
        if features.schema() != self.schema {
            return Err(ModelError::SchemaMismatch {
                expected: self.schema.width(),
                actual: features.len(),
            });
        }
        Ok(self.intercept
            + self
                .weights
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(values: Vec<f64>) -> FeatureVector {
        FeatureVector::new(FeatureSchema::Sparse, values)
    }

    #[test]
    fn test_fit_and_transform() {
        let samples = vec![sparse(vec![1.0, 10.0]), sparse(vec![3.0, 10.0])];
        let scaler = StandardScaler::fit(&samples).unwrap();
        let scaled = scaler.transform(&samples[0]).unwrap();
        assert_eq!(scaled.values()[0], -1.0);
        // constant column: scale replaced by 1, centered to 0
        assert_eq!(scaled.values()[1], 0.0);
        assert_eq!(scaled.len(), 26);
    }

    #[test]
    fn test_fit_empty_is_error() {
        assert!(matches!(
            StandardScaler::fit(&[]),
            Err(GlucoseError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let scaler = StandardScaler::new(vec![0.0; 20], vec![1.0; 20]).unwrap();
        let err = scaler.transform(&sparse(vec![])).unwrap_err();
        assert_eq!(
            err,
            ModelError::SchemaMismatch {
                expected: 20,
                actual: 26
            }
        );
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        assert!(StandardScaler::new(vec![0.0; 3], vec![1.0; 2]).is_err());
    }

    #[test]
    fn test_linear_scorer() {
        let mut weights = vec![0.0; 26];
        weights[21] = 1.0;
        let scorer = LinearScorer::new(FeatureSchema::Sparse, weights, 5.0).unwrap();
        let mut values = vec![0.0; 26];
        values[21] = 120.0;
        assert_eq!(scorer.score(&sparse(values)).unwrap(), 125.0);
    }

    #[test]
    fn test_linear_scorer_rejects_other_schema() {
        let scorer = LinearScorer::new(FeatureSchema::Sparse, vec![0.0; 26], 0.0).unwrap();
        let dense = FeatureVector::new(FeatureSchema::Dense { lookback: 6 }, vec![]);
        assert!(matches!(
            scorer.score(&dense),
            Err(ModelError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_identity_scaler() {
        let v = sparse(vec![1.0, 2.0]);
        assert_eq!(IdentityScaler.transform(&v).unwrap(), v);
    }
}
