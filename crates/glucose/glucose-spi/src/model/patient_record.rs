//! All event streams recorded for one patient session.

use serde::{Deserialize, Serialize};

use super::event::{BolusEvent, ExerciseEvent, MealEvent, Reading, SleepEvent};
use super::event_table::EventTable;

/// Per-session bundle of every stream the event table provider supplies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub glucose: EventTable<Reading>,
    pub finger_stick: EventTable<Reading>,
    pub basal: EventTable<Reading>,
    pub bolus: EventTable<BolusEvent>,
    pub meal: EventTable<MealEvent>,
    pub exercise: EventTable<ExerciseEvent>,
    pub sleep: EventTable<SleepEvent>,
    pub heart_rate: EventTable<Reading>,
    pub steps: EventTable<Reading>,
    pub skin_temp: EventTable<Reading>,
}

impl PatientRecord {
    /// A record holding only a glucose stream.
    pub fn with_glucose(glucose: EventTable<Reading>) -> Self {
        Self {
            glucose,
            ..Default::default()
        }
    }
}
