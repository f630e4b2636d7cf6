//! Glucose forecasting error types

use thiserror::Error;

use super::ModelError;

/// Errors that can occur while building features or forecasting
#[derive(Error, Debug)]
pub enum GlucoseError {
    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Required input has an invalid shape (e.g. an empty reading sequence)
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// A raw event record could not be parsed
    #[error("Malformed {stream} event: {reason}")]
    MalformedEvent { stream: String, reason: String },

    /// Learned-model failure surfaced outside the selector
    #[error(transparent)]
    Model(#[from] ModelError),
}
