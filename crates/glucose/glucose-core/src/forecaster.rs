//! End-to-end forecasting: select a raw value, then advise on it.

use glucose_api::AdvisorRules;
use glucose_spi::{ForecastResult, Reading, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::advisor::{Advisor, ForecastContext};
use crate::selector::{ForecastSelector, ModelHandle};

/// Inputs for a single forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Recent readings, ascending by time
    pub readings: Vec<Reading>,
    pub current_glucose: f64,
    pub context: ForecastContext,
}

impl ForecastRequest {
    pub fn new(readings: Vec<Reading>, current_glucose: f64, context: ForecastContext) -> Self {
        Self {
            readings,
            current_glucose,
            context,
        }
    }
}

/// A selector and an advisor sharing one rule table.
#[derive(Debug, Clone)]
pub struct GlucoseForecaster {
    selector: ForecastSelector,
    advisor: Advisor,
}

impl GlucoseForecaster {
    /// Build with a custom rule table.
    pub fn new(rules: AdvisorRules, model: Option<ModelHandle>) -> Result<Self> {
        Ok(Self {
            selector: ForecastSelector::new(model),
            advisor: Advisor::new(rules)?,
        })
    }

    /// Multi-hour trend forecaster; statistical only.
    pub fn trend() -> Self {
        Self {
            selector: ForecastSelector::statistical(),
            advisor: Advisor::trend(),
        }
    }

    /// 30-minute forecaster, attempting `model` first when given.
    pub fn glucose_30(model: Option<ModelHandle>) -> Self {
        Self {
            selector: ForecastSelector::new(model),
            advisor: Advisor::glucose_30(),
        }
    }

    pub fn rules(&self) -> &AdvisorRules {
        self.advisor.rules()
    }

    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResult> {
        let selection = self.selector.select(
            &request.readings,
            request.current_glucose,
            self.advisor.rules(),
        )?;
        let recent: Vec<f64> = request.readings.iter().map(|r| r.value).collect();
        let mut result = self.advisor.advise(
            selection.value,
            selection.model_used,
            request.current_glucose,
            &recent,
            &request.context,
        );
        result.diagnostic = selection.model_failure.as_ref().map(ToString::to_string);
        debug!(
            predicted = result.predicted_value,
            direction = %result.direction,
            model = %result.model_used,
            "forecast ready"
        );
        Ok(result)
    }
}
