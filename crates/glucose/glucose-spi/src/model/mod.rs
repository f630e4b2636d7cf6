//! Model module containing data structures
//!
//! Event tables are loaded once per patient and read-only afterwards.
//! Feature vectors and forecast records are built on demand and discarded
//! after use.

mod event;
mod event_table;
mod feature;
mod forecast_result;
mod patient_record;

pub use event::{BolusEvent, ExerciseEvent, MealEvent, Reading, SleepEvent, TimedEvent, Timestamp};
pub use event_table::EventTable;
pub use feature::{FeatureSchema, FeatureVector, LabeledSample};
pub use forecast_result::{Direction, ForecastResult, ModelUsed, RiskAlert, RiskLevel};
pub use patient_record::PatientRecord;
