use pianotes_domain::{Melody, Pitch};
use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;

/// Sound `pitch`, then wait `delay_ms` before the next step.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackStep {
    pub pitch: Pitch,
    pub delay_ms: u64,
}

/// Ordered playback steps built from a snapshot of a melody.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaybackSchedule {
    steps: Vec<PlaybackStep>,
}

impl PlaybackSchedule {
    pub fn from_melody(melody: &Melody, config: &PlaybackConfig) -> Self {
        let events = melody.events();
        let steps = events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let gap = match events.get(index + 1) {
                    Some(next) => next.offset_ms.saturating_sub(event.offset_ms),
                    None => config.tail_ms,
                };
                PlaybackStep {
                    pitch: event.pitch,
                    delay_ms: gap.max(config.floor_ms),
                }
            })
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[PlaybackStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time from the first note until playback completes.
    pub fn total_ms(&self) -> u64 {
        self.steps.iter().map(|step| step.delay_ms).sum()
    }
}
