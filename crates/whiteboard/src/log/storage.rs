//! Append-only storage for drawing events.

use std::time::Duration;

use crate::error::{Result, WhiteboardError};
use crate::types::Event;

/// Append-only, time-ordered sequence of drawing events.
///
/// Events arrive stamped with the current recording time, which never goes
/// backwards, so the log is always sorted by time. Playback and redraw only
/// read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from stored events, rejecting out-of-order timestamps.
    pub fn from_events(events: Vec<Event>) -> Result<Self> {
        if let Some(index) = events
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return Err(WhiteboardError::NonMonotonicLog { index: index + 1 });
        }
        Ok(Self { events })
    }

    /// Append an event and return its index.
    pub fn append(&mut self, event: Event) -> usize {
        debug_assert!(
            self.last_time().is_none_or(|last| last <= event.time),
            "event appended out of time order"
        );
        self.events.push(event);
        self.events.len() - 1
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Timestamp of the newest event
    pub fn last_time(&self) -> Option<Duration> {
        self.events.last().map(|event| event.time)
    }

    /// Number of events strictly before `time`
    pub fn index_at(&self, time: Duration) -> usize {
        self.events.partition_point(|event| event.time < time)
    }
}

impl std::ops::Index<usize> for EventLog {
    type Output = Event;

    fn index(&self, index: usize) -> &Event {
        &self.events[index]
    }
}
