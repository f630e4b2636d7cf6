//! Forecast output record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the forecast relative to the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rising,
    Stable,
    Dropping,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Rising => "↑",
            Direction::Stable => "→",
            Direction::Dropping => "↓",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Rising => "Rising",
            Direction::Stable => "Stable",
            Direction::Dropping => "Dropping",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rising => write!(f, "rising"),
            Direction::Stable => write!(f, "stable"),
            Direction::Dropping => write!(f, "dropping"),
        }
    }
}

/// Which forecast path produced the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelUsed {
    /// The externally trained OhioT1DM regressor
    #[serde(rename = "ohiot1dm")]
    Learned,
    /// Least-squares trend extrapolation
    #[serde(rename = "statistical")]
    Statistical,
}

impl ModelUsed {
    pub fn tag(&self) -> &'static str {
        match self {
            ModelUsed::Learned => "ohiot1dm",
            ModelUsed::Statistical => "statistical",
        }
    }
}

impl fmt::Display for ModelUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Risk alert levels, ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Forecast below the hypoglycemia threshold
    Low,
    /// Forecast above the moderate hyperglycemia threshold
    High,
    /// Forecast above the severe hyperglycemia threshold
    Severe,
}

/// An alert attached to a forecast that leaves the safe band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub level: RiskLevel,
    pub message: String,
}

/// Complete forecast record handed to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Adjusted and clamped forecast in mg/dL
    pub predicted_value: f64,
    pub direction: Direction,
    /// Always within the rule set's confidence bounds, a subset of [0, 1]
    pub confidence: f64,
    pub risk_alert: Option<RiskAlert>,
    pub recommendation: String,
    pub factors: Vec<String>,
    pub model_used: ModelUsed,
    /// Human-readable horizon, e.g. "30 minutes"
    pub timeframe: String,
    /// Why the learned model was passed over, when it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_presentation() {
        assert_eq!(Direction::Rising.arrow(), "↑");
        assert_eq!(Direction::Stable.label(), "Stable");
        assert_eq!(Direction::Dropping.to_string(), "dropping");
    }

    #[test]
    fn test_model_used_tags() {
        assert_eq!(ModelUsed::Statistical.tag(), "statistical");
        assert_eq!(ModelUsed::Learned.to_string(), "ohiot1dm");
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Severe > RiskLevel::High);
        assert!(RiskLevel::High > RiskLevel::Low);
    }
}
