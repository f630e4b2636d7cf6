//! Learned-model failure types

use thiserror::Error;

/// Failure of the learned-model scoring path.
///
/// The forecast selector catches every variant and falls back to
/// statistical extrapolation; none of these reach the caller as a hard error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// No model artifact was supplied to the selector
    #[error("No learned model is loaded")]
    MissingArtifact,

    /// The scoring function itself failed
    #[error("Scoring failed: {0}")]
    Scoring(String),

    /// Feature vector width does not match what the model was fitted on
    #[error("Schema mismatch: model expects {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// The model produced NaN or an infinite value
    #[error("Model returned a non-finite value: {0}")]
    NonFinite(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message() {
        let error = ModelError::SchemaMismatch {
            expected: 26,
            actual: 24,
        };
        assert_eq!(
            error.to_string(),
            "Schema mismatch: model expects 26 features, got 24"
        );
    }

    #[test]
    fn test_scoring_message() {
        let error = ModelError::Scoring("tree ensemble unavailable".to_string());
        assert_eq!(error.to_string(), "Scoring failed: tree ensemble unavailable");
    }

    #[test]
    fn test_non_finite_message() {
        let error = ModelError::NonFinite(f64::INFINITY);
        assert_eq!(error.to_string(), "Model returned a non-finite value: inf");
    }
}
