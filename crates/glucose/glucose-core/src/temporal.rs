//! Temporal feature builder
//!
//! Slides a fixed lookback window over a glucose table and emits one dense
//! feature vector per admissible reference point, labeled with the glucose
//! value `horizon` samples later.
//!
//! Layout of every vector (`lookback + 14` values):
//!
//! ```text
//! [normalized_window.., current_glucose, slope, std, hour_sin, hour_cos,
//!  day_of_week, minutes_since_meal, last_meal_carbs, minutes_since_bolus,
//!  last_bolus_dose, recent_exercise, recent_sleep, avg_heart_rate, recent_steps]
//! ```

use std::f64::consts::PI;

use chrono::{Datelike, Duration, Timelike};
use glucose_api::FeatureConfig;
use glucose_spi::{
    BolusEvent, EventTable, ExerciseEvent, FeatureVector, LabeledSample, MealEvent,
    PatientRecord, Reading, Result, SleepEvent, Timestamp,
};
use rayon::prelude::*;
use tracing::debug;

use crate::context::{Aggregate, ContextLookup, Window};
use crate::stats;

/// Added to the window deviation before dividing
pub const NORMALIZE_EPSILON: f64 = 1e-6;

/// Minutes reported when a stream has no prior event
pub const MISSING_MINUTES: f64 = 999.0;

/// The context streams consulted for each reference point.
#[derive(Debug, Clone, Copy)]
pub struct ContextStreams<'a> {
    pub meal: &'a EventTable<MealEvent>,
    pub bolus: &'a EventTable<BolusEvent>,
    pub exercise: &'a EventTable<ExerciseEvent>,
    pub sleep: &'a EventTable<SleepEvent>,
    pub heart_rate: &'a EventTable<Reading>,
    pub steps: &'a EventTable<Reading>,
}

impl<'a> From<&'a PatientRecord> for ContextStreams<'a> {
    fn from(record: &'a PatientRecord) -> Self {
        Self {
            meal: &record.meal,
            bolus: &record.bolus,
            exercise: &record.exercise,
            sleep: &record.sleep,
            heart_rate: &record.heart_rate,
            steps: &record.steps,
        }
    }
}

/// Builds dense labeled samples from a full glucose history.
#[derive(Debug, Clone, Default)]
pub struct TemporalFeatureBuilder {
    config: FeatureConfig,
}

impl TemporalFeatureBuilder {
    /// Create a builder, rejecting unusable configurations.
    pub fn new(config: FeatureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Build every labeled sample the glucose table admits.
    ///
    /// A table shorter than `lookback + horizon + 1` yields no samples.
    pub fn build(
        &self,
        glucose: &EventTable<Reading>,
        context: ContextStreams<'_>,
    ) -> Vec<LabeledSample> {
        let lookback = self.config.lookback;
        let horizon = self.config.horizon;
        let readings = glucose.events();

        if readings.len() < self.config.min_samples() {
            debug!(
                readings = readings.len(),
                required = self.config.min_samples(),
                "glucose table too short for feature building"
            );
            return Vec::new();
        }

        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        let lookups = Lookups::new(context);

        let samples: Vec<LabeledSample> = (lookback..readings.len() - horizon)
            .map(|i| LabeledSample {
                features: self.features_at(&values[i - lookback..i], readings[i].timestamp, &lookups),
                target: values[i + horizon],
            })
            .collect();

        debug!(samples = samples.len(), lookback, horizon, "built temporal features");
        samples
    }

    /// Build samples from a patient record's glucose and context streams.
    pub fn build_for_record(&self, record: &PatientRecord) -> Vec<LabeledSample> {
        self.build(&record.glucose, ContextStreams::from(record))
    }

    /// Build samples for many independent patients in parallel.
    ///
    /// Output order matches input order.
    pub fn build_many(&self, records: &[PatientRecord]) -> Vec<Vec<LabeledSample>> {
        records
            .par_iter()
            .map(|record| self.build_for_record(record))
            .collect()
    }

    fn features_at(&self, window: &[f64], now: Timestamp, lookups: &Lookups<'_>) -> FeatureVector {
        let mut values = Vec::with_capacity(self.config.schema().width());

        // Glucose window
        values.extend(stats::z_normalize(window, NORMALIZE_EPSILON));
        values.push(window[window.len() - 1]);
        values.push(stats::slope(window));
        values.push(stats::std_dev(window));

        // Time of day / week
        let angle = 2.0 * PI * now.hour() as f64 / 24.0;
        values.push(angle.sin());
        values.push(angle.cos());
        values.push(now.weekday().num_days_from_monday() as f64);

        // Meals and insulin
        let (meal_minutes, meal_carbs) = lookups
            .meal
            .minutes_since_last(now)
            .unwrap_or((MISSING_MINUTES, 0.0));
        let (bolus_minutes, bolus_dose) = lookups
            .bolus
            .minutes_since_last(now)
            .unwrap_or((MISSING_MINUTES, 0.0));
        values.extend([meal_minutes, meal_carbs, bolus_minutes, bolus_dose]);

        // Activity and physiology
        let heart_rate_span =
            Duration::minutes(self.config.lookback as i64 * self.config.sample_interval_minutes);
        values.push(
            lookups
                .exercise
                .aggregate(Window::trailing(now, Duration::hours(2)), Aggregate::Any)
                .unwrap_or(0.0),
        );
        values.push(
            lookups
                .sleep
                .aggregate(
                    Window::trailing_inclusive(now, Duration::minutes(30)),
                    Aggregate::Any,
                )
                .unwrap_or(0.0),
        );
        values.push(
            lookups
                .heart_rate
                .aggregate(Window::trailing(now, heart_rate_span), Aggregate::Mean)
                .unwrap_or(0.0),
        );
        values.push(
            lookups
                .steps
                .aggregate(Window::trailing(now, Duration::hours(1)), Aggregate::Sum)
                .unwrap_or(0.0),
        );

        FeatureVector::new(self.config.schema(), values)
    }
}

struct Lookups<'a> {
    meal: ContextLookup<'a, MealEvent>,
    bolus: ContextLookup<'a, BolusEvent>,
    exercise: ContextLookup<'a, ExerciseEvent>,
    sleep: ContextLookup<'a, SleepEvent>,
    heart_rate: ContextLookup<'a, Reading>,
    steps: ContextLookup<'a, Reading>,
}

impl<'a> Lookups<'a> {
    fn new(context: ContextStreams<'a>) -> Self {
        Self {
            meal: ContextLookup::new(context.meal),
            bolus: ContextLookup::new(context.bolus),
            exercise: ContextLookup::new(context.exercise),
            sleep: ContextLookup::new(context.sleep),
            heart_rate: ContextLookup::new(context.heart_rate),
            steps: ContextLookup::new(context.steps),
        }
    }
}
