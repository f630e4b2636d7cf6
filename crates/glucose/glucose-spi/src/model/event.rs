//! Timestamped event types, one per stream shape.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Instant on the patient's local clock.
pub type Timestamp = NaiveDateTime;

/// Common view over every stream's events.
pub trait TimedEvent {
    /// When the event happened.
    fn timestamp(&self) -> Timestamp;

    /// The scalar used when aggregating over a window
    /// (value, carbs, dose, intensity or quality depending on the stream).
    fn magnitude(&self) -> f64;
}

/// A plain `(timestamp, value)` sample.
///
/// Used for glucose, heart rate, steps, finger stick, basal and skin
/// temperature streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: Timestamp,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: Timestamp, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl TimedEvent for Reading {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn magnitude(&self) -> f64 {
        self.value
    }
}

/// A logged meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEvent {
    pub timestamp: Timestamp,
    pub meal_type: String,
    /// Grams of carbohydrate, never negative
    pub carbs: f64,
}

impl MealEvent {
    pub fn new(timestamp: Timestamp, meal_type: impl Into<String>, carbs: f64) -> Self {
        Self {
            timestamp,
            meal_type: meal_type.into(),
            carbs: carbs.max(0.0),
        }
    }
}

impl TimedEvent for MealEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn magnitude(&self) -> f64 {
        self.carbs
    }
}

/// An insulin bolus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BolusEvent {
    pub timestamp: Timestamp,
    /// Units of insulin, never negative
    pub dose: f64,
}

impl BolusEvent {
    pub fn new(timestamp: Timestamp, dose: f64) -> Self {
        Self {
            timestamp,
            dose: dose.max(0.0),
        }
    }
}

impl TimedEvent for BolusEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn magnitude(&self) -> f64 {
        self.dose
    }
}

/// A self-reported exercise session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEvent {
    pub timestamp: Timestamp,
    pub intensity: i32,
    /// Minutes
    pub duration: f64,
}

impl ExerciseEvent {
    pub fn new(timestamp: Timestamp, intensity: i32, duration: f64) -> Self {
        Self {
            timestamp,
            intensity,
            duration,
        }
    }
}

impl TimedEvent for ExerciseEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn magnitude(&self) -> f64 {
        self.intensity as f64
    }
}

/// End of a sleep period with its self-reported quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepEvent {
    pub timestamp: Timestamp,
    pub quality: i32,
}

impl SleepEvent {
    pub fn new(timestamp: Timestamp, quality: i32) -> Self {
        Self { timestamp, quality }
    }
}

impl TimedEvent for SleepEvent {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn magnitude(&self) -> f64 {
        self.quality as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_negative_carbs_are_clamped() {
        let meal = MealEvent::new(at(8, 0), "breakfast", -12.0);
        assert_eq!(meal.carbs, 0.0);
    }

    #[test]
    fn test_negative_dose_is_clamped() {
        let bolus = BolusEvent::new(at(8, 0), -1.5);
        assert_eq!(bolus.dose, 0.0);
    }

    #[test]
    fn test_magnitude_per_stream() {
        assert_eq!(Reading::new(at(8, 0), 123.0).magnitude(), 123.0);
        assert_eq!(MealEvent::new(at(8, 0), "lunch", 45.0).magnitude(), 45.0);
        assert_eq!(BolusEvent::new(at(8, 0), 4.2).magnitude(), 4.2);
        assert_eq!(ExerciseEvent::new(at(8, 0), 3, 30.0).magnitude(), 3.0);
        assert_eq!(SleepEvent::new(at(8, 0), 2).magnitude(), 2.0);
    }
}
