//! Benchmark suite for feature construction and forecasting.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glucose_core::{
    ForecastContext, ForecastRequest, GlucoseForecaster, SparseFeatureAdapter,
    TemporalFeatureBuilder,
};
use glucose_spi::{EventTable, ExerciseEvent, MealEvent, PatientRecord, Reading};

fn create_record(size: usize) -> PatientRecord {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let at = |i: usize| start + Duration::minutes(5 * i as i64);

    let glucose = (0..size)
        .map(|i| Reading::new(at(i), 120.0 + (i as f64 * 0.1).sin() * 40.0))
        .collect();
    let meals = (0..size)
        .step_by(72)
        .map(|i| MealEvent::new(at(i), "meal", 45.0))
        .collect();
    let exercise = (0..size)
        .step_by(288)
        .map(|i| ExerciseEvent::new(at(i), 5, 30.0))
        .collect();
    let heart_rate = (0..size).map(|i| Reading::new(at(i), 70.0)).collect();

    PatientRecord {
        glucose: EventTable::new(glucose),
        meal: EventTable::new(meals),
        exercise: EventTable::new(exercise),
        heart_rate: EventTable::new(heart_rate),
        ..Default::default()
    }
}

fn bench_temporal_builder(c: &mut Criterion) {
    let builder = TemporalFeatureBuilder::default();
    let mut group = c.benchmark_group("TemporalFeatureBuilder");

    for size in [288, 2016, 8064].iter() {
        let record = create_record(*size);
        group.bench_with_input(BenchmarkId::new("build", size), &record, |b, record| {
            b.iter(|| builder.build_for_record(black_box(record)))
        });
    }

    let records: Vec<PatientRecord> = (0..6).map(|_| create_record(2016)).collect();
    group.bench_function("build_many_6x2016", |b| {
        b.iter(|| builder.build_many(black_box(&records)))
    });

    group.finish();
}

fn bench_sparse_and_forecast(c: &mut Criterion) {
    let record = create_record(12);
    let readings = record.glucose.events().to_vec();
    let adapter = SparseFeatureAdapter::new();
    let forecaster = GlucoseForecaster::glucose_30(None);
    let request = ForecastRequest::new(readings.clone(), 125.0, ForecastContext::default());

    c.bench_function("sparse_adapter_12", |b| {
        b.iter(|| adapter.build(black_box(&readings), 125.0))
    });
    c.bench_function("forecast_glucose_30", |b| {
        b.iter(|| forecaster.forecast(black_box(&request)))
    });
}

criterion_group!(benches, bench_temporal_builder, bench_sparse_and_forecast);
criterion_main!(benches);
