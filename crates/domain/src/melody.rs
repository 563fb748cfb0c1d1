use serde::{Deserialize, Serialize};

use crate::{DomainError, Pitch};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedEvent {
    pub pitch: Pitch,
    /// Milliseconds since the recording session started.
    pub offset_ms: u64,
}

impl RecordedEvent {
    pub fn new(pitch: Pitch, offset_ms: u64) -> Self {
        Self { pitch, offset_ms }
    }
}

/// Chronologically ordered key presses captured during one recording session.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<RecordedEvent>", into = "Vec<RecordedEvent>")]
pub struct Melody {
    events: Vec<RecordedEvent>,
}

impl Melody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<RecordedEvent>) -> Result<Self, DomainError> {
        let mut melody = Self::new();
        for event in events {
            melody.push(event)?;
        }
        Ok(melody)
    }

    pub fn push(&mut self, event: RecordedEvent) -> Result<(), DomainError> {
        if let Some(last) = self.events.last() {
            if event.offset_ms < last.offset_ms {
                return Err(DomainError::validation(format!(
                    "event at {}ms precedes previous event at {}ms",
                    event.offset_ms, last.offset_ms
                )));
            }
        }
        self.events.push(event);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Offset of the last key press, zero for an empty melody.
    pub fn span_ms(&self) -> u64 {
        self.events.last().map(|event| event.offset_ms).unwrap_or(0)
    }
}

impl TryFrom<Vec<RecordedEvent>> for Melody {
    type Error = DomainError;

    fn try_from(events: Vec<RecordedEvent>) -> Result<Self, Self::Error> {
        Self::from_events(events)
    }
}

impl From<Melody> for Vec<RecordedEvent> {
    fn from(melody: Melody) -> Self {
        melody.events
    }
}
