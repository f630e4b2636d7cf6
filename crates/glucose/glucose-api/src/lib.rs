//! Glucose Forecasting Consumer API
//!
//! Configuration types for the glucose forecasting engine.
//!
//! This crate provides:
//! - `FeatureConfig` for the temporal feature builder
//! - `AdvisorRules`, one parameterized rule table with a preset for the
//!   multi-hour trend and one for the 30-minute forecast
//! - Re-exports from SPI for convenience

pub use glucose_spi::{
    Direction, FeatureSchema, FeatureVector, ForecastResult, GlucoseError, LabeledSample,
    ModelError, ModelUsed, Result, RiskAlert, RiskLevel,
};

use serde::{Deserialize, Serialize};

// ============================================================================
// Feature Configuration
// ============================================================================

/// Configuration for dense temporal feature building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Prior glucose samples in each window (default: 12, one hour at 5 min)
    pub lookback: usize,
    /// Samples ahead of the reference point used as label (default: 6)
    pub horizon: usize,
    /// Native sampling interval of the glucose stream in minutes (default: 5)
    pub sample_interval_minutes: i64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            lookback: 12,
            horizon: 6,
            sample_interval_minutes: 5,
        }
    }
}

impl FeatureConfig {
    pub fn new(lookback: usize, horizon: usize) -> Self {
        Self {
            lookback,
            horizon,
            ..Default::default()
        }
    }

    /// Smallest glucose table that yields at least one sample.
    pub fn min_samples(&self) -> usize {
        self.lookback + self.horizon + 1
    }

    /// Schema of the vectors this configuration produces.
    pub fn schema(&self) -> FeatureSchema {
        FeatureSchema::Dense {
            lookback: self.lookback,
        }
    }

    /// Reject configurations the builder cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.lookback < 2 {
            return Err(GlucoseError::InvalidParameter {
                name: "lookback".to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        if self.horizon == 0 {
            return Err(GlucoseError::InvalidParameter {
                name: "horizon".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.sample_interval_minutes <= 0 {
            return Err(GlucoseError::InvalidParameter {
                name: "sample_interval_minutes".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Advisor Rule Table
// ============================================================================

/// How the statistical path projects the fitted line forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extrapolation {
    /// `current + slope * slope_factor`
    Linear { slope_factor: f64 },
    /// `current + slope * slope_factor + last first-difference`
    LinearWithMomentum { slope_factor: f64 },
}

/// Additive adjustments applied to the raw forecast before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextAdjustments {
    /// Meal logged less than an hour ago
    pub meal_within_hour: f64,
    /// Meal logged one to two hours ago
    pub meal_one_to_two_hours: f64,
    /// Last meal more than four hours ago
    pub meal_over_four_hours: f64,
    /// Patient is on glucose-lowering treatment
    pub medication: f64,
    /// Hours 4 through 7
    pub dawn: f64,
    /// Hours 22 through 3
    pub night: f64,
    /// High or frequent activity logged
    pub activity: f64,
}

/// Confidence model: a base that grows with the number of readings up to
/// a cap, minus a coefficient-of-variation penalty, floored, plus an
/// optional bonus when the learned model answered, then bounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceRules {
    pub base: f64,
    pub per_reading: f64,
    pub base_cap: f64,
    pub cv_penalty: f64,
    pub floor: f64,
    pub learned_bonus: f64,
    pub min: f64,
    pub max: f64,
}

/// One complete advisory rule set.
///
/// The trend and 30-minute endpoints share every step of the advisory
/// logic and differ only in these numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorRules {
    /// Human-readable horizon reported with every forecast
    pub timeframe: String,
    pub adjustments: ContextAdjustments,
    /// Symmetric threshold on `predicted - current` classified as stable
    pub dead_band: f64,
    pub clamp_min: f64,
    pub clamp_max: f64,
    pub confidence: ConfidenceRules,
    pub extrapolation: Extrapolation,
    /// Whether the learned model is attempted before the statistical path
    pub use_learned_model: bool,
}

impl AdvisorRules {
    /// Multi-hour trend rule set.
    pub fn trend() -> Self {
        Self {
            timeframe: "next few hours".to_string(),
            adjustments: ContextAdjustments {
                meal_within_hour: 15.0,
                meal_one_to_two_hours: 5.0,
                meal_over_four_hours: -5.0,
                medication: -10.0,
                dawn: 8.0,
                night: -5.0,
                activity: -8.0,
            },
            dead_band: 10.0,
            clamp_min: 40.0,
            clamp_max: 400.0,
            confidence: ConfidenceRules {
                base: 0.5,
                per_reading: 0.05,
                base_cap: 0.85,
                cv_penalty: 1.0,
                floor: 0.3,
                learned_bonus: 0.0,
                min: 0.3,
                max: 0.85,
            },
            extrapolation: Extrapolation::LinearWithMomentum { slope_factor: 2.0 },
            use_learned_model: false,
        }
    }

    /// 30-minute forecast rule set.
    pub fn glucose_30() -> Self {
        Self {
            timeframe: "30 minutes".to_string(),
            adjustments: ContextAdjustments {
                meal_within_hour: 10.0,
                meal_one_to_two_hours: 3.0,
                meal_over_four_hours: -3.0,
                medication: -5.0,
                dawn: 5.0,
                night: -3.0,
                activity: -5.0,
            },
            dead_band: 8.0,
            clamp_min: 40.0,
            clamp_max: 400.0,
            confidence: ConfidenceRules {
                base: 0.55,
                per_reading: 0.04,
                base_cap: 0.8,
                cv_penalty: 0.5,
                floor: 0.25,
                learned_bonus: 0.1,
                min: 0.25,
                max: 0.92,
            },
            extrapolation: Extrapolation::Linear { slope_factor: 0.5 },
            use_learned_model: true,
        }
    }

    /// Reject tables whose bounds are inverted or out of range.
    pub fn validate(&self) -> Result<()> {
        if self.clamp_min >= self.clamp_max {
            return Err(GlucoseError::InvalidParameter {
                name: "clamp_min".to_string(),
                reason: "must be below clamp_max".to_string(),
            });
        }
        if self.dead_band < 0.0 {
            return Err(GlucoseError::InvalidParameter {
                name: "dead_band".to_string(),
                reason: "must not be negative".to_string(),
            });
        }
        let c = &self.confidence;
        if !(0.0..=1.0).contains(&c.min) || !(0.0..=1.0).contains(&c.max) || c.min > c.max {
            return Err(GlucoseError::InvalidParameter {
                name: "confidence".to_string(),
                reason: "bounds must satisfy 0 <= min <= max <= 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AdvisorRules {
    fn default() -> Self {
        Self::glucose_30()
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdvisorRules, ConfidenceRules, ContextAdjustments, Extrapolation, FeatureConfig,
    };
    pub use glucose_spi::{
        Direction, EventTable, FeatureSchema, FeatureScaler, FeatureVector, ForecastResult,
        GlucoseError, LabeledSample, ModelError, ModelUsed, PatientRecord, Reading, Result,
        RiskAlert, RiskLevel, Scorer,
    };
}
