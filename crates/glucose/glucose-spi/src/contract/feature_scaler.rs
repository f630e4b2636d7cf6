//! Feature scaling transform paired with a scorer

use crate::error::ModelError;
use crate::model::FeatureVector;

/// Per-feature transform fitted during the same training phase as the scorer.
pub trait FeatureScaler: Send + Sync {
    /// Scale a feature vector into the space the scorer was trained in.
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, ModelError>;
}
