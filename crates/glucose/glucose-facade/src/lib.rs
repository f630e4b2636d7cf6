//! Glucose Facade
//!
//! High-level API for glucose feature building and forecasting.
//! Re-exports all public types from the glucose stack for convenient usage.

// Re-export everything from API (which includes SPI)
pub use glucose_api::*;

// Explicit re-exports for documentation
pub use glucose_api::prelude;

// Re-export core modules for direct access
pub use glucose_core::{
    advisor, context, evaluation, forecaster, ingest, scaler, selector, sparse, statistical,
    stats, temporal, weekly,
};

// Re-export main types at root
pub use glucose_core::{
    evaluate, ingest_record, summarize, Advisor, Aggregate, ContextLookup, ContextStreams,
    EvaluationReport, ForecastContext, ForecastRequest, ForecastSelector, GlucoseForecaster,
    IdentityScaler, LinearScorer, ModelHandle, RawEvent, RawSections, ReadingContext, Selection,
    SparseFeatureAdapter, StandardScaler, TaggedReading, TemporalFeatureBuilder, TrendFit,
    WeeklyTrend, Window,
};

// Re-export SPI traits and models
pub use glucose_spi::{
    BolusEvent, EventTable, ExerciseEvent, FeatureScaler, MealEvent, PatientRecord, Reading,
    Scorer, SleepEvent, TimedEvent, Timestamp,
};
