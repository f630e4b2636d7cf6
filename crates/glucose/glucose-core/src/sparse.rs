//! Sparse feature adapter
//!
//! Produces a 26-wide vector matching the learned model's live schema from
//! as little as a single reading. Short input degrades feature quality but
//! never fails.
//!
//! Layout:
//!
//! ```text
//! [lag_0..lag_5 (most recent first), diff_0..diff_4, mean, std, min, max,
//!  hour_sin, hour_cos, dow_sin, dow_cos, rate_of_change, acceleration,
//!  current_value, 0.0 x 4]
//! ```

use std::f64::consts::PI;

use chrono::{Datelike, Timelike};
use glucose_spi::{FeatureSchema, FeatureVector, Reading};

use crate::stats;

/// Number of recent values the adapter works on
pub const RECENT_LEN: usize = 6;

/// Builds live-schema feature vectors from a short reading sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SparseFeatureAdapter;

impl SparseFeatureAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Build a vector from `readings` (ascending by time) and the
    /// caller-supplied current value.
    ///
    /// With no readings at all, `current_value` stands in as the only
    /// reading and time is encoded as midnight on a Monday.
    pub fn build(&self, readings: &[Reading], current_value: f64) -> FeatureVector {
        let real: Vec<f64> = if readings.is_empty() {
            vec![current_value]
        } else {
            readings.iter().map(|r| r.value).collect()
        };

        let recent = pad_recent(&real);

        let real_tail = &real[real.len().saturating_sub(RECENT_LEN)..];
        let mut diffs = stats::differences(real_tail);
        let real_diffs = diffs.len();
        let mut padded_diffs = vec![0.0; (RECENT_LEN - 1) - real_diffs];
        padded_diffs.append(&mut diffs);

        let (hour, weekday) = readings
            .last()
            .map(|r| {
                (
                    r.timestamp.hour() as f64,
                    r.timestamp.weekday().num_days_from_monday() as f64,
                )
            })
            .unwrap_or((0.0, 0.0));

        let first = recent[0];
        let last = recent[RECENT_LEN - 1];
        let rate_of_change = (last - first) / (RECENT_LEN - 1) as f64;
        let acceleration = if real_diffs >= 2 {
            padded_diffs[RECENT_LEN - 2] - padded_diffs[RECENT_LEN - 3]
        } else {
            0.0
        };

        let mut values = Vec::with_capacity(FeatureVector::SPARSE_WIDTH);
        values.extend(recent.iter().rev());
        values.extend(&padded_diffs);
        values.push(stats::mean(&recent));
        values.push(stats::std_dev(&recent));
        values.push(recent.iter().copied().fold(f64::INFINITY, f64::min));
        values.push(recent.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        values.push((2.0 * PI * hour / 24.0).sin());
        values.push((2.0 * PI * hour / 24.0).cos());
        values.push((2.0 * PI * weekday / 7.0).sin());
        values.push((2.0 * PI * weekday / 7.0).cos());
        values.push(rate_of_change);
        values.push(acceleration);
        values.push(current_value);

        FeatureVector::new(FeatureSchema::Sparse, values)
    }
}

/// Left-pad with the earliest value up to `RECENT_LEN`, then keep the last
/// `RECENT_LEN`.
fn pad_recent(values: &[f64]) -> Vec<f64> {
    let mut padded = Vec::with_capacity(values.len().max(RECENT_LEN));
    if values.len() < RECENT_LEN {
        padded.resize(RECENT_LEN - values.len(), values[0]);
    }
    padded.extend_from_slice(values);
    padded.split_off(padded.len() - RECENT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use glucose_spi::Timestamp;

    // Wednesday
    fn start() -> Timestamp {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn readings(values: &[f64]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(start() + Duration::minutes(5 * i as i64), v))
            .collect()
    }

    #[test]
    fn test_always_26_wide() {
        let adapter = SparseFeatureAdapter::new();
        for n in [1, 3, 6, 10] {
            let values: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * 2.0).collect();
            let v = adapter.build(&readings(&values), 130.0);
            assert_eq!(v.len(), 26, "n = {}", n);
            assert_eq!(v.schema(), FeatureSchema::Sparse);
        }
    }

    #[test]
    fn test_empty_input_is_well_formed() {
        let v = SparseFeatureAdapter::new().build(&[], 115.0);
        assert_eq!(v.len(), 26);
        assert!(v.values()[..6].iter().all(|&x| x == 115.0));
        assert_eq!(v.values()[20], 0.0);
        assert_eq!(v.values()[21], 115.0);
    }

    #[test]
    fn test_single_reading_pads_by_repetition() {
        let v = SparseFeatureAdapter::new().build(&readings(&[120.0]), 121.0);
        let x = v.values();
        assert!(x[..6].iter().all(|&l| l == 120.0));
        assert!(x[6..11].iter().all(|&d| d == 0.0));
        assert_eq!(x[11], 120.0);
        assert_eq!(x[12], 0.0);
        assert_eq!(x[19], 0.0);
        assert_eq!(x[20], 0.0);
        assert_eq!(x[21], 121.0);
        assert!(x[22..].iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_three_readings_layout() {
        let v = SparseFeatureAdapter::new().build(&readings(&[110.0, 115.0, 125.0]), 125.0);
        let x = v.values();
        // recent = [110, 110, 110, 110, 115, 125], reversed
        assert_eq!(&x[..6], &[125.0, 115.0, 110.0, 110.0, 110.0, 110.0]);
        assert_eq!(&x[6..11], &[0.0, 0.0, 0.0, 5.0, 10.0]);
        assert_eq!(x[13], 110.0);
        assert_eq!(x[14], 125.0);
        assert!((x[19] - 3.0).abs() < 1e-12);
        assert_eq!(x[20], 5.0);
    }

    #[test]
    fn test_long_input_uses_last_six() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let v = SparseFeatureAdapter::new().build(&readings(&values), 109.0);
        let x = v.values();
        assert_eq!(&x[..6], &[109.0, 108.0, 107.0, 106.0, 105.0, 104.0]);
        assert!(x[6..11].iter().all(|&d| d == 1.0));
        assert_eq!(x[20], 0.0);
    }

    #[test]
    fn test_cyclical_time_of_latest_reading() {
        let v = SparseFeatureAdapter::new().build(&readings(&[100.0, 101.0]), 101.0);
        let x = v.values();
        let hour = 2.0 * PI * 8.0 / 24.0;
        let dow = 2.0 * PI * 2.0 / 7.0;
        assert!((x[15] - hour.sin()).abs() < 1e-12);
        assert!((x[16] - hour.cos()).abs() < 1e-12);
        assert!((x[17] - dow.sin()).abs() < 1e-12);
        assert!((x[18] - dow.cos()).abs() < 1e-12);
    }
}
