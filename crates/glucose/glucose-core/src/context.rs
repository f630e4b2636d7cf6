//! Context lookup over a sorted event table.
//!
//! Both queries binary-search the table, so the repeated, monotonically
//! advancing lookups made by the temporal builder stay logarithmic per
//! call without any cursor state.

use chrono::Duration;
use glucose_spi::{EventTable, TimedEvent, Timestamp};

/// Aggregation applied to the magnitudes of events inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
    /// 1.0 when at least one event falls in the window
    Any,
    Max,
}

/// Time interval `[start, end)`, or `[start, end]` when `end_inclusive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: Timestamp,
    pub end: Timestamp,
    pub end_inclusive: bool,
}

impl Window {
    /// `[t - before, t + after)`
    pub fn around(t: Timestamp, before: Duration, after: Duration) -> Self {
        Self {
            start: t - before,
            end: t + after,
            end_inclusive: false,
        }
    }

    /// `[t - span, t)`
    pub fn trailing(t: Timestamp, span: Duration) -> Self {
        Self::around(t, span, Duration::zero())
    }

    /// `[t - span, t]`
    pub fn trailing_inclusive(t: Timestamp, span: Duration) -> Self {
        Self {
            start: t - span,
            end: t,
            end_inclusive: true,
        }
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && (ts < self.end || (self.end_inclusive && ts == self.end))
    }
}

/// Read-only query view over one stream.
#[derive(Debug, Clone, Copy)]
pub struct ContextLookup<'a, E> {
    events: &'a [E],
}

impl<'a, E: TimedEvent> ContextLookup<'a, E> {
    pub fn new(table: &'a EventTable<E>) -> Self {
        Self {
            events: table.events(),
        }
    }

    /// Most recent event strictly before `t`.
    pub fn last_before(&self, t: Timestamp) -> Option<&'a E> {
        let idx = self.events.partition_point(|e| e.timestamp() < t);
        idx.checked_sub(1).map(|i| &self.events[i])
    }

    /// Events inside `window`, in table order.
    pub fn in_window(&self, window: Window) -> &'a [E] {
        let lo = self.events.partition_point(|e| e.timestamp() < window.start);
        let hi = if window.end_inclusive {
            self.events.partition_point(|e| e.timestamp() <= window.end)
        } else {
            self.events.partition_point(|e| e.timestamp() < window.end)
        };
        if hi <= lo {
            return &[];
        }
        &self.events[lo..hi]
    }

    /// Aggregate the magnitudes of events in `window`.
    ///
    /// Returns `None` when no event falls inside it, for every operation.
    pub fn aggregate(&self, window: Window, op: Aggregate) -> Option<f64> {
        let hits = self.in_window(window);
        if hits.is_empty() {
            return None;
        }
        let values = hits.iter().map(TimedEvent::magnitude);
        Some(match op {
            Aggregate::Sum => values.sum(),
            Aggregate::Mean => values.sum::<f64>() / hits.len() as f64,
            Aggregate::Any => 1.0,
            Aggregate::Max => values.fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// `aggregate` over `[t - before, t + after)`.
    pub fn aggregate_in_window(
        &self,
        t: Timestamp,
        before: Duration,
        after: Duration,
        op: Aggregate,
    ) -> Option<f64> {
        self.aggregate(Window::around(t, before, after), op)
    }

    /// Minutes elapsed from the last event strictly before `t`, with its magnitude.
    pub fn minutes_since_last(&self, t: Timestamp) -> Option<(f64, f64)> {
        self.last_before(t).map(|e| {
            let minutes = (t - e.timestamp()).num_seconds() as f64 / 60.0;
            (minutes, e.magnitude())
        })
    }
}
