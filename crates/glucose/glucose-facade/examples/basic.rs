//! Basic glucose forecasting example.
//!
//! Builds training samples from a synthetic day, then produces a 30-minute
//! forecast and a multi-hour trend from the last few readings.
//!
//! Run with `RUST_LOG=glucose_core=debug` to see the selector's decisions.

use chrono::{Duration, NaiveDate};
use glucose_facade::prelude::*;
use glucose_facade::{
    ForecastContext, ForecastRequest, GlucoseForecaster, MealEvent, TemporalFeatureBuilder,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glucose_core=info".into()),
        )
        .init();

    println!("=== Glucose Forecasting Example ===\n");

    let start = NaiveDate::from_ymd_opt(2024, 3, 4)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| GlucoseError::PreconditionViolation("invalid start date".to_string()))?;

    let glucose: EventTable<Reading> = (0..288)
        .map(|i| {
            let value = 120.0 + ((i as f64) * 0.07).sin() * 45.0;
            Reading::new(start + Duration::minutes(5 * i), value)
        })
        .collect();
    let breakfast = start + Duration::hours(7);
    let record = PatientRecord {
        glucose,
        meal: EventTable::new(vec![MealEvent::new(breakfast, "breakfast", 60.0)]),
        ..Default::default()
    };

    // Training samples
    let builder = TemporalFeatureBuilder::new(FeatureConfig::default())?;
    let samples = builder.build_for_record(&record);
    println!("Built {} labeled samples", samples.len());
    if let Some(first) = samples.first() {
        println!("Feature width: {}", first.features.len());
    }

    // Live forecasts from the half hour leading up to 07:40
    let now = breakfast + Duration::minutes(40);
    let live: Vec<Reading> = record
        .glucose
        .iter()
        .filter(|r| r.timestamp > now - Duration::minutes(30) && r.timestamp <= now)
        .copied()
        .collect();
    let current = live.last().map(|r| r.value).unwrap_or_default();
    let context = ForecastContext::observe(&record, now, false);
    let request = ForecastRequest::new(live, current, context);

    for (name, forecaster) in [
        ("30-minute", GlucoseForecaster::glucose_30(None)),
        ("trend", GlucoseForecaster::trend()),
    ] {
        let result = forecaster.forecast(&request)?;
        println!("\n{} forecast ({}):", name, result.timeframe);
        println!(
            "  {:.1} mg/dL {} {}",
            result.predicted_value,
            result.direction.arrow(),
            result.direction.label()
        );
        println!("  confidence: {:.2}", result.confidence);
        println!("  model: {}", result.model_used);
        if let Some(alert) = &result.risk_alert {
            println!("  alert: {}", alert.message);
        }
        println!("  {}", result.recommendation);
        for factor in &result.factors {
            println!("  - {}", factor);
        }
    }

    Ok(())
}
