//! Glucose Core
//!
//! Core implementations for temporal feature construction, context
//! lookup, learned/statistical forecast selection, and advisory output.

pub mod advisor;
pub mod context;
pub mod evaluation;
pub mod forecaster;
pub mod ingest;
pub mod scaler;
pub mod selector;
pub mod sparse;
pub mod statistical;
pub mod stats;
pub mod temporal;
pub mod weekly;

// Re-export SPI traits for implementations
pub use glucose_spi::{FeatureScaler, GlucoseError, ModelError, Result, Scorer};

// Re-export main types
pub use advisor::{Advisor, ForecastContext};
pub use context::{Aggregate, ContextLookup, Window};
pub use evaluation::{evaluate, EvaluationReport};
pub use forecaster::{ForecastRequest, GlucoseForecaster};
pub use ingest::{ingest_record, RawEvent, RawSections};
pub use scaler::{IdentityScaler, LinearScorer, StandardScaler};
pub use selector::{ForecastSelector, ModelHandle, Selection};
pub use sparse::SparseFeatureAdapter;
pub use statistical::TrendFit;
pub use temporal::{ContextStreams, TemporalFeatureBuilder};
pub use weekly::{summarize, ReadingContext, TaggedReading, WeeklyTrend};
