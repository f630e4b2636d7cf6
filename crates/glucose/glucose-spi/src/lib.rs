//! Glucose Forecasting Service Provider Interface
//!
//! Defines the event data model, feature vectors, forecast records, and the
//! traits an externally trained model must implement to plug into the
//! forecasting core.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{FeatureScaler, Scorer};
pub use error::{GlucoseError, ModelError, Result};
pub use model::{
    BolusEvent, Direction, EventTable, ExerciseEvent, FeatureSchema, FeatureVector,
    ForecastResult, LabeledSample, MealEvent, ModelUsed, PatientRecord, Reading, RiskAlert,
    RiskLevel, SleepEvent, TimedEvent, Timestamp,
};
