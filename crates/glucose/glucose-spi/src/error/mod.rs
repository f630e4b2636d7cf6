//! Error module containing error types and result aliases

mod glucose_error;
mod model_error;

pub use glucose_error::GlucoseError;
pub use model_error::ModelError;

/// Result type for glucose forecasting operations
pub type Result<T> = std::result::Result<T, GlucoseError>;
