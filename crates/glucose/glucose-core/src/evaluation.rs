//! Model evaluation metrics

use glucose_spi::{GlucoseError, LabeledSample, Result};
use serde::{Deserialize, Serialize};

use crate::selector::ModelHandle;
use crate::stats;

/// Summary of predictions against held-out labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub mae: f64,
    pub rmse: f64,
    pub r_squared: f64,
    /// Fraction of predictions within ±20 mg/dL
    pub within_20: f64,
    /// Fraction of predictions within ±40 mg/dL
    pub within_40: f64,
    pub samples: usize,
}

/// Score `samples` with `model` and compare against their targets.
///
/// Any scoring failure aborts the evaluation.
pub fn evaluate(samples: &[LabeledSample], model: &ModelHandle) -> Result<EvaluationReport> {
    let predicted = samples
        .iter()
        .map(|s| model.predict(&s.features))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let actual: Vec<f64> = samples.iter().map(|s| s.target).collect();
    report(&predicted, &actual)
}

/// Compute the report from paired predictions and targets.
pub fn report(predicted: &[f64], actual: &[f64]) -> Result<EvaluationReport> {
    if predicted.is_empty() {
        return Err(GlucoseError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    if predicted.len() != actual.len() {
        return Err(GlucoseError::InvalidParameter {
            name: "actual".to_string(),
            reason: format!("expected {} targets, got {}", predicted.len(), actual.len()),
        });
    }

    let n = predicted.len() as f64;
    let errors: Vec<f64> = predicted.iter().zip(actual).map(|(p, a)| p - a).collect();
    let within = |limit: f64| errors.iter().filter(|e| e.abs() <= limit).count() as f64 / n;

    Ok(EvaluationReport {
        mae: errors.iter().map(|e| e.abs()).sum::<f64>() / n,
        rmse: (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt(),
        r_squared: r_squared(&errors, actual),
        within_20: within(20.0),
        within_40: within(40.0),
        samples: predicted.len(),
    })
}

fn r_squared(errors: &[f64], actual: &[f64]) -> f64 {
    let mean = stats::mean(actual);
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    let ss_res: f64 = errors.iter().map(|e| e * e).sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
