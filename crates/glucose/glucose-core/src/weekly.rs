//! Week-over-week glucose trend summary.

use std::collections::HashMap;

use chrono::Duration;
use glucose_spi::{Direction, Timestamp};
use serde::{Deserialize, Serialize};

use crate::stats;

/// Percentage band around zero change reported as stable
pub const STABLE_BAND_PERCENT: f64 = 5.0;

/// Readings above this value count toward the risk period
pub const HIGH_READING: f64 = 180.0;

const NO_RISK_PERIOD: &str = "No high-risk periods detected";

/// When a manual reading was taken relative to meals and sleep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingContext {
    Fasting,
    AfterMeal,
    BeforeMeal,
    Bedtime,
    #[default]
    Random,
}

impl ReadingContext {
    /// Sentence used when this context dominates the high readings.
    pub fn risk_period(&self) -> &'static str {
        match self {
            ReadingContext::Fasting => "Fasting readings tend to run high",
            ReadingContext::AfterMeal => "Post-meal readings tend to spike",
            ReadingContext::BeforeMeal => "Pre-meal readings tend to run high",
            ReadingContext::Bedtime => "Bedtime readings tend to be elevated",
            ReadingContext::Random => "Some random readings are elevated",
        }
    }
}

/// A logged reading with its context tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaggedReading {
    pub timestamp: Timestamp,
    pub value: f64,
    #[serde(default)]
    pub context: ReadingContext,
}

impl TaggedReading {
    pub fn new(timestamp: Timestamp, value: f64, context: ReadingContext) -> Self {
        Self {
            timestamp,
            value,
            context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    pub direction: Direction,
    /// Rounded to whole mg/dL
    pub current_average: f64,
    /// `None` when the previous week has no readings
    pub previous_average: Option<f64>,
    /// Rounded to one decimal; 0 without a previous week
    pub percentage_change: f64,
    pub total_readings: usize,
    pub risk_period: String,
    pub recommendation: String,
}

/// Compare two weeks of readings.
///
/// Returns `None` when `current_week` is empty.
pub fn summarize(
    current_week: &[TaggedReading],
    previous_week: &[TaggedReading],
) -> Option<WeeklyTrend> {
    if current_week.is_empty() {
        return None;
    }

    let values = |week: &[TaggedReading]| week.iter().map(|r| r.value).collect::<Vec<_>>();
    let current_avg = stats::mean(&values(current_week));
    let previous_avg = (!previous_week.is_empty()).then(|| stats::mean(&values(previous_week)));

    let percentage_change = match previous_avg {
        Some(prev) if prev != 0.0 => (current_avg - prev) / prev * 100.0,
        _ => 0.0,
    };
    let direction = if percentage_change > STABLE_BAND_PERCENT {
        Direction::Rising
    } else if percentage_change < -STABLE_BAND_PERCENT {
        Direction::Dropping
    } else {
        Direction::Stable
    };

    let recommendation = match direction {
        Direction::Rising => {
            "Your average glucose has been rising. Consider reviewing your meals and activity."
        }
        Direction::Dropping => "Your average glucose is trending down. Good progress!",
        Direction::Stable => "Your glucose levels are looking stable. Keep it up!",
    };

    Some(WeeklyTrend {
        direction,
        current_average: current_avg.round(),
        previous_average: previous_avg.map(f64::round),
        percentage_change: (percentage_change * 10.0).round() / 10.0,
        total_readings: current_week.len(),
        risk_period: risk_period(current_week).to_string(),
        recommendation: recommendation.to_string(),
    })
}

/// Split `readings` at `now` into the last seven days and the seven before,
/// then summarize.
pub fn summarize_at(readings: &[TaggedReading], now: Timestamp) -> Option<WeeklyTrend> {
    let one_week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);

    let (current, older): (Vec<TaggedReading>, Vec<TaggedReading>) =
        readings.iter().copied().partition(|r| r.timestamp >= one_week_ago);
    let previous: Vec<TaggedReading> = older
        .into_iter()
        .filter(|r| r.timestamp >= two_weeks_ago)
        .collect();

    summarize(&current, &previous)
}

/// Most frequent context among high readings; ties go to the context seen first.
fn risk_period(week: &[TaggedReading]) -> &'static str {
    let mut counts: HashMap<ReadingContext, (usize, usize)> = HashMap::new();
    for (order, reading) in week.iter().filter(|r| r.value > HIGH_READING).enumerate() {
        counts.entry(reading.context).or_insert((0, order)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(context, _)| context.risk_period())
        .unwrap_or(NO_RISK_PERIOD)
}
