//! Forecast selector
//!
//! Tries the learned model first and falls back to statistical
//! extrapolation when that path fails for any reason. The model is an
//! explicit, immutable handle passed in at construction; there is no
//! process-wide model state.

use std::sync::Arc;

use glucose_api::AdvisorRules;
use glucose_spi::{
    FeatureScaler, FeatureSchema, FeatureVector, GlucoseError, ModelError, ModelUsed, Reading,
    Result, Scorer,
};
use tracing::{debug, warn};

use crate::sparse::SparseFeatureAdapter;
use crate::statistical::TrendFit;

/// A trained scorer together with the scaler fitted alongside it.
///
/// Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct ModelHandle {
    scorer: Arc<dyn Scorer>,
    scaler: Arc<dyn FeatureScaler>,
}

impl ModelHandle {
    pub fn new(scorer: Arc<dyn Scorer>, scaler: Arc<dyn FeatureScaler>) -> Self {
        Self { scorer, scaler }
    }

    pub fn schema(&self) -> FeatureSchema {
        self.scorer.schema()
    }

    pub fn name(&self) -> &str {
        self.scorer.name()
    }

    /// Scale then score one feature vector.
    pub fn predict(&self, features: &FeatureVector) -> std::result::Result<f64, ModelError> {
        let expected = self.scorer.schema();
        if features.schema() != expected {
            return Err(ModelError::SchemaMismatch {
                expected: expected.width(),
                actual: features.len(),
            });
        }
        let scaled = self.scaler.transform(features)?;
        let value = self.scorer.score(&scaled)?;
        if !value.is_finite() {
            return Err(ModelError::NonFinite(value));
        }
        Ok(value)
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("scorer", &self.scorer.name())
            .field("schema", &self.scorer.schema())
            .finish()
    }
}

/// Raw forecast before contextual adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub value: f64,
    pub model_used: ModelUsed,
    /// Why the learned path was not used, when it was attempted
    pub model_failure: Option<ModelError>,
}

/// Chooses between the learned-model and statistical paths.
#[derive(Debug, Clone, Default)]
pub struct ForecastSelector {
    model: Option<ModelHandle>,
    adapter: SparseFeatureAdapter,
}

impl ForecastSelector {
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self {
            model,
            adapter: SparseFeatureAdapter::new(),
        }
    }

    /// A selector with no learned model; always statistical.
    pub fn statistical() -> Self {
        Self::new(None)
    }

    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Produce a raw forecast from `readings` (ascending by time).
    ///
    /// An empty reading sequence, or a non-finite reading or current value,
    /// is a hard error. Learned-model failures
    /// never are: they are recorded on the selection and the statistical
    /// path answers instead.
    pub fn select(
        &self,
        readings: &[Reading],
        current: f64,
        rules: &AdvisorRules,
    ) -> Result<Selection> {
        if readings.is_empty() {
            return Err(GlucoseError::PreconditionViolation(
                "at least one glucose reading is required".to_string(),
            ));
        }

        if !current.is_finite() {
            return Err(GlucoseError::PreconditionViolation(format!(
                "current glucose must be finite, got {}",
                current
            )));
        }
        if let Some(bad) = readings.iter().find(|r| !r.value.is_finite()) {
            return Err(GlucoseError::PreconditionViolation(format!(
                "reading at {} is not finite: {}",
                bad.timestamp, bad.value
            )));
        }

        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        let fit = TrendFit::fit(&values)?;

        if !rules.use_learned_model {
            return Ok(Selection {
                value: fit.project(current, rules.extrapolation),
                model_used: ModelUsed::Statistical,
                model_failure: None,
            });
        }

        match self.try_model(readings, current) {
            Ok(value) => {
                debug!(value, "learned model forecast");
                Ok(Selection {
                    value,
                    model_used: ModelUsed::Learned,
                    model_failure: None,
                })
            }
            Err(failure) => {
                warn!(error = %failure, "learned model unavailable, using statistical fallback");
                Ok(Selection {
                    value: fit.project(current, rules.extrapolation),
                    model_used: ModelUsed::Statistical,
                    model_failure: Some(failure),
                })
            }
        }
    }

    fn try_model(&self, readings: &[Reading], current: f64) -> std::result::Result<f64, ModelError> {
        let model = self.model.as_ref().ok_or(ModelError::MissingArtifact)?;
        let features = self.adapter.build(readings, current);
        model.predict(&features)
    }
}
