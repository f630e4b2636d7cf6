//! Raw event ingest
//!
//! Raw events arrive as attribute maps (`ts`, `value`, `carbs`, ...) grouped
//! by section name. Each record is parsed on its own; a malformed record is
//! logged and skipped, never fatal to the stream.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use glucose_spi::{
    BolusEvent, EventTable, ExerciseEvent, GlucoseError, MealEvent, PatientRecord, Reading,
    Result, SleepEvent, TimedEvent, Timestamp,
};
use tracing::{debug, warn};

/// Timestamp layout used by the source dataset
pub const TS_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One raw event: attribute name to raw string value.
pub type RawEvent = BTreeMap<String, String>;

/// Raw events grouped by section name.
pub type RawSections = BTreeMap<String, Vec<RawEvent>>;

pub fn parse_timestamp(stream: &str, raw: &str) -> Result<Timestamp> {
    NaiveDateTime::parse_from_str(raw.trim(), TS_FORMAT)
        .map_err(|e| malformed(stream, format!("timestamp '{}': {}", raw, e)))
}

/// Parse every record with `parse`, skipping the ones that fail.
pub fn collect<E, F>(stream: &str, raw: &[RawEvent], parse: F) -> EventTable<E>
where
    E: TimedEvent,
    F: Fn(&str, &RawEvent) -> Result<E>,
{
    let mut skipped = 0usize;
    let events: Vec<E> = raw
        .iter()
        .filter_map(|record| match parse(stream, record) {
            Ok(event) => Some(event),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "skipping event");
                None
            }
        })
        .collect();
    debug!(stream, parsed = events.len(), skipped, "ingested stream");
    EventTable::new(events)
}

/// `ts` plus a required numeric `value`.
pub fn parse_reading(stream: &str, record: &RawEvent) -> Result<Reading> {
    let timestamp = parse_timestamp(stream, required(stream, record, "ts")?)?;
    let value = number(stream, "value", required(stream, record, "value")?)?;
    Ok(Reading::new(timestamp, value))
}

/// `ts`, optional `type` (default "unknown") and optional `carbs`.
pub fn parse_meal(stream: &str, record: &RawEvent) -> Result<MealEvent> {
    let timestamp = parse_timestamp(stream, required(stream, record, "ts")?)?;
    let meal_type = record.get("type").map(String::as_str).unwrap_or("unknown");
    let carbs = optional_number(stream, record, "carbs")?;
    Ok(MealEvent::new(timestamp, meal_type, carbs))
}

/// `ts_begin` (or `ts`) plus optional `dose`.
pub fn parse_bolus(stream: &str, record: &RawEvent) -> Result<BolusEvent> {
    let ts = first_present(record, &["ts_begin", "ts"])
        .ok_or_else(|| malformed(stream, "missing 'ts_begin'"))?;
    let timestamp = parse_timestamp(stream, ts)?;
    Ok(BolusEvent::new(timestamp, optional_number(stream, record, "dose")?))
}

/// `ts` plus optional integer `intensity` and optional `duration`.
pub fn parse_exercise(stream: &str, record: &RawEvent) -> Result<ExerciseEvent> {
    let timestamp = parse_timestamp(stream, required(stream, record, "ts")?)?;
    let intensity = optional_integer(stream, record, "intensity")?;
    let duration = optional_number(stream, record, "duration")?;
    Ok(ExerciseEvent::new(timestamp, intensity, duration))
}

/// `ts_end` (or `ts`) plus optional integer `quality`.
pub fn parse_sleep(stream: &str, record: &RawEvent) -> Result<SleepEvent> {
    let ts = first_present(record, &["ts_end", "ts"])
        .ok_or_else(|| malformed(stream, "missing 'ts_end'"))?;
    let timestamp = parse_timestamp(stream, ts)?;
    Ok(SleepEvent::new(timestamp, optional_integer(stream, record, "quality")?))
}

/// Assemble a patient record from named sections.
///
/// Unknown sections are ignored and absent ones yield empty tables.
pub fn ingest_record(sections: &RawSections) -> PatientRecord {
    let section = |name: &str| sections.get(name).map(Vec::as_slice).unwrap_or(&[]);

    PatientRecord {
        glucose: collect("glucose_level", section("glucose_level"), parse_reading),
        finger_stick: collect("finger_stick", section("finger_stick"), parse_reading),
        basal: collect("basal", section("basal"), parse_reading),
        bolus: collect("bolus", section("bolus"), parse_bolus),
        meal: collect("meal", section("meal"), parse_meal),
        exercise: collect("exercise", section("exercise"), parse_exercise),
        sleep: collect("sleep", section("sleep"), parse_sleep),
        heart_rate: collect("basis_heart_rate", section("basis_heart_rate"), parse_reading),
        steps: collect("basis_steps", section("basis_steps"), parse_reading),
        skin_temp: collect(
            "basis_skin_temperature",
            section("basis_skin_temperature"),
            parse_reading,
        ),
    }
}

fn malformed(stream: &str, reason: impl Into<String>) -> GlucoseError {
    GlucoseError::MalformedEvent {
        stream: stream.to_string(),
        reason: reason.into(),
    }
}

fn first_present<'a>(record: &'a RawEvent, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| record.get(*k))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

fn required<'a>(stream: &str, record: &'a RawEvent, key: &str) -> Result<&'a str> {
    first_present(record, &[key]).ok_or_else(|| malformed(stream, format!("missing '{}'", key)))
}

fn number(stream: &str, key: &str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(malformed(
            stream,
            format!("'{}' is not a finite number: '{}'", key, raw),
        )),
    }
}

fn optional_number(stream: &str, record: &RawEvent, key: &str) -> Result<f64> {
    match first_present(record, &[key]) {
        Some(raw) => number(stream, key, raw),
        None => Ok(0.0),
    }
}

fn optional_integer(stream: &str, record: &RawEvent, key: &str) -> Result<i32> {
    match first_present(record, &[key]) {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| malformed(stream, format!("'{}' is not an integer: '{}'", key, raw))),
        None => Ok(0),
    }
}
