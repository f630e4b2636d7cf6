//! Trend classifier and advisor
//!
//! Turns a raw forecast into the reported record. The steps always run in
//! the same order: contextual adjustment, clamp, direction, confidence,
//! risk alert, recommendation, factors. Every number comes from the
//! `AdvisorRules` table, so the trend and 30-minute endpoints share this
//! code and differ only in data.

use chrono::Duration;
use glucose_api::{AdvisorRules, ConfidenceRules};
use glucose_spi::{
    Direction, ExerciseEvent, ForecastResult, MealEvent, ModelUsed, PatientRecord, Result,
    RiskAlert, RiskLevel, Timestamp,
};
use serde::{Deserialize, Serialize};

use crate::context::{Aggregate, ContextLookup, Window};
use crate::stats;

pub const LOW_ALERT: f64 = 70.0;
pub const HIGH_ALERT: f64 = 180.0;
pub const SEVERE_ALERT: f64 = 250.0;

/// Target band for "stable, in range" messaging
pub const TARGET_RANGE: (f64, f64) = (70.0, 140.0);

/// Thresholds for directional warnings
pub const WARN_LOW: f64 = 80.0;
pub const WARN_HIGH: f64 = 180.0;

const FALLBACK_FACTOR: &str = "Based on your recent glucose pattern";

/// Situational inputs to the contextual adjustment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastContext {
    /// Hours since the last meal, if one is known
    pub hours_since_meal: Option<f64>,
    pub on_medication: bool,
    /// Local hour, 0..=23
    pub hour_of_day: u32,
    /// High or frequent activity, or an activity logged recently
    pub high_activity: bool,
}

impl ForecastContext {
    /// Derive meal recency and activity from a patient's streams at `now`.
    ///
    /// Activity is any exercise logged in the two hours before `now`.
    pub fn observe(record: &PatientRecord, now: Timestamp, on_medication: bool) -> Self {
        use chrono::Timelike;

        let meals: ContextLookup<'_, MealEvent> = ContextLookup::new(&record.meal);
        let exercise: ContextLookup<'_, ExerciseEvent> = ContextLookup::new(&record.exercise);

        Self {
            hours_since_meal: meals
                .minutes_since_last(now)
                .map(|(minutes, _)| minutes / 60.0),
            on_medication,
            hour_of_day: now.hour(),
            high_activity: exercise
                .aggregate(Window::trailing(now, Duration::hours(2)), Aggregate::Any)
                .is_some(),
        }
    }
}

/// Applies one rule table to raw forecasts.
#[derive(Debug, Clone)]
pub struct Advisor {
    rules: AdvisorRules,
}

impl Advisor {
    /// Create an advisor, rejecting inconsistent rule tables.
    pub fn new(rules: AdvisorRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn trend() -> Self {
        Self {
            rules: AdvisorRules::trend(),
        }
    }

    pub fn glucose_30() -> Self {
        Self {
            rules: AdvisorRules::glucose_30(),
        }
    }

    pub fn rules(&self) -> &AdvisorRules {
        &self.rules
    }

    /// Build the full forecast record.
    ///
    /// `recent` are the readings the forecast was made from; they drive the
    /// confidence score. Deterministic and side-effect free.
    pub fn advise(
        &self,
        raw_forecast: f64,
        model_used: ModelUsed,
        current: f64,
        recent: &[f64],
        context: &ForecastContext,
    ) -> ForecastResult {
        let (adjustment, mut factors) = self.adjust(context);
        let predicted_value =
            (raw_forecast + adjustment).clamp(self.rules.clamp_min, self.rules.clamp_max);
        let direction = self.direction(predicted_value, current);
        let confidence = confidence(&self.rules.confidence, recent, model_used);

        if factors.is_empty() {
            factors.push(FALLBACK_FACTOR.to_string());
        } else {
            factors.push(path_factor(model_used).to_string());
        }

        ForecastResult {
            predicted_value,
            direction,
            confidence,
            risk_alert: risk_alert(predicted_value),
            recommendation: recommendation(direction, predicted_value).to_string(),
            factors,
            model_used,
            timeframe: self.rules.timeframe.clone(),
            diagnostic: None,
        }
    }

    /// Total additive adjustment and one factor string per rule that fired.
    fn adjust(&self, context: &ForecastContext) -> (f64, Vec<String>) {
        let a = &self.rules.adjustments;
        let mut total = 0.0;
        let mut factors = Vec::new();

        if let Some(hours) = context.hours_since_meal.filter(|h| *h >= 0.0) {
            if hours < 1.0 {
                total += a.meal_within_hour;
                factors.push("Meal in the last hour is still being absorbed".to_string());
            } else if hours <= 2.0 {
                total += a.meal_one_to_two_hours;
                factors.push("Meal 1-2 hours ago".to_string());
            } else if hours > 4.0 {
                total += a.meal_over_four_hours;
                factors.push("No meal in over 4 hours".to_string());
            }
        }

        if context.on_medication {
            total += a.medication;
            factors.push("Glucose-lowering medication".to_string());
        }

        match context.hour_of_day {
            4..=7 => {
                total += a.dawn;
                factors.push("Early-morning dawn phenomenon".to_string());
            }
            0..=3 | 22..=23 => {
                total += a.night;
                factors.push("Overnight hours".to_string());
            }
            _ => {}
        }

        if context.high_activity {
            total += a.activity;
            factors.push("Recent physical activity".to_string());
        }

        (total, factors)
    }

    fn direction(&self, predicted: f64, current: f64) -> Direction {
        let delta = predicted - current;
        if delta > self.rules.dead_band {
            Direction::Rising
        } else if delta < -self.rules.dead_band {
            Direction::Dropping
        } else {
            Direction::Stable
        }
    }
}

fn path_factor(model_used: ModelUsed) -> &'static str {
    match model_used {
        ModelUsed::Learned => "Forecast from the OhioT1DM-trained model",
        ModelUsed::Statistical => "Forecast from the trend of recent readings",
    }
}

fn confidence(rules: &ConfidenceRules, recent: &[f64], model_used: ModelUsed) -> f64 {
    let base = (rules.base + rules.per_reading * recent.len() as f64).min(rules.base_cap);
    let penalty = rules.cv_penalty * stats::coefficient_of_variation(recent);
    let mut score = (base - penalty).max(rules.floor);
    if model_used == ModelUsed::Learned {
        score += rules.learned_bonus;
    }
    score.clamp(rules.min, rules.max)
}

fn risk_alert(predicted: f64) -> Option<RiskAlert> {
    let (level, message) = if predicted < LOW_ALERT {
        (
            RiskLevel::Low,
            "Glucose may fall below 70 mg/dL. Consider a fast-acting carbohydrate.",
        )
    } else if predicted > SEVERE_ALERT {
        (
            RiskLevel::Severe,
            "Glucose may rise above 250 mg/dL. Check for ketones and follow your care plan.",
        )
    } else if predicted > HIGH_ALERT {
        (
            RiskLevel::High,
            "Glucose may rise above 180 mg/dL.",
        )
    } else {
        return None;
    };
    Some(RiskAlert {
        level,
        message: message.to_string(),
    })
}

fn recommendation(direction: Direction, predicted: f64) -> &'static str {
    let in_range = predicted >= TARGET_RANGE.0 && predicted <= TARGET_RANGE.1;
    match direction {
        Direction::Rising if predicted > WARN_HIGH => {
            "Glucose is heading above your target. A short walk or reviewing recent carbs may help."
        }
        Direction::Rising => "Glucose is rising. Keep an eye on your next reading.",
        Direction::Dropping if predicted < WARN_LOW => {
            "Glucose is heading low. Consider a small snack and recheck soon."
        }
        Direction::Dropping => "Glucose is easing down. No action needed right now.",
        Direction::Stable if in_range => "Glucose looks stable and in range. Keep it up!",
        Direction::Stable => "Glucose is steady but outside your target range.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> ForecastContext {
        ForecastContext {
            hour_of_day: 12,
            ..Default::default()
        }
    }

    fn classify(forecast: f64) -> Direction {
        Advisor::glucose_30()
            .advise(forecast, ModelUsed::Statistical, 100.0, &[100.0], &neutral())
            .direction
    }

    #[test]
    fn test_dead_band_30_minute() {
        assert_eq!(classify(108.0), Direction::Stable);
        assert_eq!(classify(109.0), Direction::Rising);
        assert_eq!(classify(92.0), Direction::Stable);
        assert_eq!(classify(91.0), Direction::Dropping);
    }

    #[test]
    fn test_dead_band_trend() {
        let advisor = Advisor::trend();
        let at = |f| {
            advisor
                .advise(f, ModelUsed::Statistical, 100.0, &[100.0], &neutral())
                .direction
        };
        assert_eq!(at(110.0), Direction::Stable);
        assert_eq!(at(111.0), Direction::Rising);
        assert_eq!(at(89.0), Direction::Dropping);
    }

    #[test]
    fn test_clamp_bounds() {
        let advisor = Advisor::glucose_30();
        for raw in [-50.0, 0.0, 39.9, 40.0, 250.0, 400.0, 900.0] {
            let result = advisor.advise(raw, ModelUsed::Statistical, 120.0, &[120.0], &neutral());
            assert!((40.0..=400.0).contains(&result.predicted_value));
        }
    }

    #[test]
    fn test_risk_alert_table() {
        let level = |v: f64| {
            Advisor::glucose_30()
                .advise(v, ModelUsed::Statistical, v, &[v], &neutral())
                .risk_alert
                .map(|a| a.level)
        };
        assert_eq!(level(65.0), Some(RiskLevel::Low));
        assert_eq!(level(260.0), Some(RiskLevel::Severe));
        assert_eq!(level(190.0), Some(RiskLevel::High));
        assert_eq!(level(120.0), None);
    }

    #[test]
    fn test_meal_bands_30_minute() {
        let advisor = Advisor::glucose_30();
        let raw = |hours: f64| {
            let ctx = ForecastContext {
                hours_since_meal: Some(hours),
                ..neutral()
            };
            advisor
                .advise(120.0, ModelUsed::Statistical, 120.0, &[120.0], &ctx)
                .predicted_value
        };
        assert_eq!(raw(0.5), 130.0);
        assert_eq!(raw(1.5), 123.0);
        assert_eq!(raw(3.0), 120.0);
        assert_eq!(raw(5.0), 117.0);
    }

    #[test]
    fn test_adjustments_accumulate_before_clamp() {
        let ctx = ForecastContext {
            hours_since_meal: Some(0.2),
            on_medication: true,
            hour_of_day: 5,
            high_activity: true,
        };
        let result = Advisor::trend().advise(100.0, ModelUsed::Statistical, 100.0, &[100.0], &ctx);
        // +15 - 10 + 8 - 8
        assert_eq!(result.predicted_value, 105.0);
        assert_eq!(result.factors.len(), 5);

        let low = Advisor::trend().advise(42.0, ModelUsed::Statistical, 60.0, &[60.0], &ForecastContext {
            on_medication: true,
            hour_of_day: 23,
            ..Default::default()
        });
        assert_eq!(low.predicted_value, 40.0);
    }

    #[test]
    fn test_night_hours() {
        let advisor = Advisor::glucose_30();
        for hour in [22, 23, 0, 3] {
            let ctx = ForecastContext {
                hour_of_day: hour,
                ..Default::default()
            };
            let r = advisor.advise(120.0, ModelUsed::Statistical, 120.0, &[120.0], &ctx);
            assert_eq!(r.predicted_value, 117.0, "hour {}", hour);
        }
    }

    #[test]
    fn test_fallback_factor_when_nothing_fires() {
        let result =
            Advisor::glucose_30().advise(120.0, ModelUsed::Statistical, 120.0, &[120.0], &neutral());
        assert_eq!(result.factors, vec![FALLBACK_FACTOR.to_string()]);
    }

    #[test]
    fn test_path_factor_follows_rules() {
        let ctx = ForecastContext {
            on_medication: true,
            ..neutral()
        };
        let result = Advisor::glucose_30().advise(120.0, ModelUsed::Learned, 120.0, &[120.0], &ctx);
        assert_eq!(result.factors.len(), 2);
        assert!(result.factors[1].contains("OhioT1DM"));
    }

    #[test]
    fn test_confidence_bounds_and_bonus() {
        let advisor = Advisor::glucose_30();
        let noisy = [40.0, 400.0];
        let stat = advisor.advise(120.0, ModelUsed::Statistical, 120.0, &noisy, &neutral());
        assert_eq!(stat.confidence, 0.25);

        let many = [120.0; 20];
        let learned = advisor.advise(120.0, ModelUsed::Learned, 120.0, &many, &neutral());
        let statistical = advisor.advise(120.0, ModelUsed::Statistical, 120.0, &many, &neutral());
        assert!((statistical.confidence - 0.8).abs() < 1e-12);
        assert!((learned.confidence - 0.9).abs() < 1e-12);
        assert!(learned.confidence <= 0.92);
    }

    #[test]
    fn test_trend_confidence_bounds() {
        let r = Advisor::trend().advise(120.0, ModelUsed::Statistical, 120.0, &[120.0; 30], &neutral());
        assert!((r.confidence - 0.85).abs() < 1e-12);
        let r = Advisor::trend().advise(120.0, ModelUsed::Statistical, 120.0, &[50.0, 350.0], &neutral());
        assert_eq!(r.confidence, 0.3);
    }

    #[test]
    fn test_recommendation_table() {
        assert!(recommendation(Direction::Stable, 110.0).contains("in range"));
        assert!(recommendation(Direction::Stable, 160.0).contains("outside"));
        assert!(recommendation(Direction::Rising, 200.0).contains("above your target"));
        assert!(recommendation(Direction::Rising, 150.0).contains("rising"));
        assert!(recommendation(Direction::Dropping, 75.0).contains("snack"));
        assert!(recommendation(Direction::Dropping, 120.0).contains("easing"));
    }

    #[test]
    fn test_advise_is_idempotent() {
        let advisor = Advisor::glucose_30();
        let ctx = ForecastContext {
            hours_since_meal: Some(1.5),
            on_medication: true,
            hour_of_day: 6,
            high_activity: false,
        };
        let a = advisor.advise(150.0, ModelUsed::Learned, 140.0, &[130.0, 135.0, 140.0], &ctx);
        let b = advisor.advise(150.0, ModelUsed::Learned, 140.0, &[130.0, 135.0, 140.0], &ctx);
        assert_eq!(a, b);
        assert_eq!(a.confidence.to_bits(), b.confidence.to_bits());
        assert_eq!(a.predicted_value.to_bits(), b.predicted_value.to_bits());
    }

    #[test]
    fn test_new_rejects_invalid_rules() {
        let rules = AdvisorRules {
            dead_band: -1.0,
            ..AdvisorRules::glucose_30()
        };
        assert!(Advisor::new(rules).is_err());
    }

    #[test]
    fn test_observe_context_from_record() {
        use chrono::NaiveDate;
        use glucose_spi::EventTable;

        let now = NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let record = PatientRecord {
            meal: EventTable::new(vec![MealEvent::new(now - Duration::minutes(90), "breakfast", 50.0)]),
            exercise: EventTable::new(vec![ExerciseEvent::new(now - Duration::minutes(30), 4, 20.0)]),
            ..Default::default()
        };
        let ctx = ForecastContext::observe(&record, now, true);
        assert_eq!(ctx.hours_since_meal, Some(1.5));
        assert_eq!(ctx.hour_of_day, 9);
        assert!(ctx.high_activity);
        assert!(ctx.on_medication);
    }
}
