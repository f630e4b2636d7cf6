//! Statistical extrapolation fallback.
//!
//! Fits a least-squares line to the value sequence against its index and
//! projects it forward from the current value.

use glucose_api::Extrapolation;
use glucose_spi::{GlucoseError, Result};

use crate::stats;

/// Fitted trend of a short value sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendFit {
    /// Change per sample; 0 for fewer than two values
    pub slope: f64,
    /// Last first-difference; 0 for a single value
    pub last_change: f64,
}

impl TrendFit {
    /// Fit a sequence. An empty sequence is a precondition violation.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(GlucoseError::PreconditionViolation(
                "statistical extrapolation needs at least one value".to_string(),
            ));
        }
        let last_change = match values {
            [.., prev, last] => last - prev,
            _ => 0.0,
        };
        Ok(Self {
            slope: stats::slope(values),
            last_change,
        })
    }

    /// Project from `current` with the given extrapolation rule.
    pub fn project(&self, current: f64, extrapolation: Extrapolation) -> f64 {
        match extrapolation {
            Extrapolation::Linear { slope_factor } => current + self.slope * slope_factor,
            Extrapolation::LinearWithMomentum { slope_factor } => {
                current + self.slope * slope_factor + self.last_change
            }
        }
    }
}

/// Fit `values` and project from `current` in one step.
pub fn extrapolate(values: &[f64], current: f64, extrapolation: Extrapolation) -> Result<f64> {
    Ok(TrendFit::fit(values)?.project(current, extrapolation))
}
