//! Feature vectors and labeled samples.

use serde::{Deserialize, Serialize};

/// Which layout a feature vector follows.
///
/// Dense and sparse vectors are never interchangeable: a model fitted on
/// one schema must be scored with the same schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSchema {
    /// Built from a full history table: `lookback + 14` values.
    Dense { lookback: usize },
    /// Built from a handful of live readings: always 26 values.
    Sparse,
}

impl FeatureSchema {
    /// Number of scalar features in any vector of this schema.
    pub fn width(&self) -> usize {
        match self {
            FeatureSchema::Dense { lookback } => lookback + FeatureVector::DENSE_EXTRA,
            FeatureSchema::Sparse => FeatureVector::SPARSE_WIDTH,
        }
    }
}

/// Fixed-length, immutable sequence of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Width of the sparse live-reading schema.
    pub const SPARSE_WIDTH: usize = 26;

    /// Scalars appended after the normalized window in the dense schema.
    pub const DENSE_EXTRA: usize = 14;

    /// Wrap values under a schema.
    ///
    /// Values are truncated or zero-padded to the schema's width so the
    /// vector is always well formed.
    pub fn new(schema: FeatureSchema, mut values: Vec<f64>) -> Self {
        values.resize(schema.width(), 0.0);
        Self { schema, values }
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// A feature vector paired with the glucose value observed `horizon`
/// samples after its reference point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub target: f64,
}
