//! Opaque scoring function trait

use crate::error::ModelError;
use crate::model::{FeatureSchema, FeatureVector};

/// An externally trained predictive function treated as a black box.
pub trait Scorer: Send + Sync {
    /// Schema the model was fitted on.
    fn schema(&self) -> FeatureSchema;

    /// Predict a glucose value from an already scaled feature vector.
    fn score(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Short identifier for diagnostics
    fn name(&self) -> &str {
        "scorer"
    }
}
