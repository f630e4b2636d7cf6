//! Time-ordered event table for a single stream.

use serde::{Deserialize, Deserializer, Serialize};

use super::event::{TimedEvent, Timestamp};

/// Events of one stream, sorted ascending by timestamp.
///
/// Duplicate timestamps are legal and all of them are kept in their
/// original relative order. Serialized as a plain array; deserializing
/// goes through [`EventTable::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventTable<E> {
    events: Vec<E>,
}

impl<E> Default for EventTable<E> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<E: TimedEvent> EventTable<E> {
    /// Build a table, stable-sorting the events by timestamp.
    pub fn new(mut events: Vec<E>) -> Self {
        events.sort_by_key(|e| e.timestamp());
        Self { events }
    }

    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Earliest timestamp, if any.
    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.events.first().map(TimedEvent::timestamp)
    }

    /// Latest timestamp, if any.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.events.last().map(TimedEvent::timestamp)
    }

    /// Magnitudes in table order.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.events.iter().map(TimedEvent::magnitude).collect()
    }
}

impl<E> EventTable<E> {
    pub fn events(&self) -> &[E] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.events.iter()
    }
}

impl<E: TimedEvent> FromIterator<E> for EventTable<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'de, E> Deserialize<'de> for EventTable<E>
where
    E: TimedEvent + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<E>::deserialize(deserializer).map(Self::new)
    }
}

impl<'a, E> IntoIterator for &'a EventTable<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
