use std::time::Duration;

use pianotes_audio::{Tone, ToneSink};
use pianotes_domain::{Melody, Pitch, RecordedEvent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::PlaybackConfig;
use crate::error::RecorderError;
use crate::schedule::PlaybackSchedule;

/// Called with every pitch that sounds, live or replayed.
pub type NoteListener = Box<dyn FnMut(Pitch)>;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransportState {
    Idle,
    Recording,
    Playing,
}

#[derive(Debug)]
struct ActivePlayback {
    schedule: PlaybackSchedule,
    cursor: usize,
    /// When the next step fires, or when playback ends once every step has fired.
    next_at_ms: u64,
}

#[derive(Debug)]
enum Transport {
    Idle,
    Recording { started_at_ms: u64 },
    Playing(ActivePlayback),
}

/// Captures timed key presses and replays them with their recorded spacing.
///
/// Playback never blocks: [`MelodyRecorder::poll`] fires whatever steps are
/// due on the injected clock, and [`MelodyRecorder::next_deadline`] tells the
/// host when to poll again.
pub struct MelodyRecorder<C: Clock, S: ToneSink> {
    clock: C,
    sink: S,
    config: PlaybackConfig,
    melody: Melody,
    transport: Transport,
    listener: Option<NoteListener>,
}

impl<C: Clock, S: ToneSink> MelodyRecorder<C, S> {
    pub fn new(clock: C, sink: S, config: PlaybackConfig) -> Self {
        Self {
            clock,
            sink,
            config,
            melody: Melody::new(),
            transport: Transport::Idle,
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: NoteListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn set_listener(&mut self, listener: Option<NoteListener>) {
        self.listener = listener;
    }

    pub fn state(&self) -> TransportState {
        match self.transport {
            Transport::Idle => TransportState::Idle,
            Transport::Recording { .. } => TransportState::Recording,
            Transport::Playing(_) => TransportState::Playing,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == TransportState::Recording
    }

    pub fn is_playing(&self) -> bool {
        self.state() == TransportState::Playing
    }

    pub fn melody(&self) -> &Melody {
        &self.melody
    }

    /// Replaces the current melody, e.g. with one loaded from a file.
    pub fn load_melody(&mut self, melody: Melody) -> Result<(), RecorderError> {
        match self.transport {
            Transport::Recording { .. } => Err(RecorderError::RecordingInProgress),
            _ => {
                self.melody = melody;
                Ok(())
            }
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Starts a fresh session, discarding the previous melody.
    pub fn start_recording(&mut self) -> Result<(), RecorderError> {
        if self.is_playing() {
            return Err(RecorderError::PlaybackInProgress);
        }
        let started_at_ms = self.clock.now_ms();
        self.melody.clear();
        self.transport = Transport::Recording { started_at_ms };
        info!(started_at_ms, "recording started");
        Ok(())
    }

    /// Ends the session and keeps the melody. Returns whether a session was active.
    pub fn stop_recording(&mut self) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.transport = Transport::Idle;
        info!(events = self.melody.len(), "recording stopped");
        true
    }

    /// Sounds `pitch` and, while recording, appends it to the melody.
    pub fn press_key(&mut self, pitch: Pitch) {
        self.sound(pitch);
        let Transport::Recording { started_at_ms } = self.transport else {
            return;
        };
        let offset_ms = self
            .clock
            .now_ms()
            .saturating_sub(started_at_ms)
            .max(self.melody.span_ms());
        match self.melody.push(RecordedEvent::new(pitch, offset_ms)) {
            Ok(()) => debug!(%pitch, offset_ms, "recorded key press"),
            Err(err) => warn!(%pitch, error = %err, "key press not recorded"),
        }
    }

    /// Starts replaying a snapshot of the melody. Returns `Ok(false)` when
    /// there is nothing to play or a playback is already running.
    pub fn play_melody(&mut self) -> Result<bool, RecorderError> {
        match self.transport {
            Transport::Recording { .. } => return Err(RecorderError::RecordingInProgress),
            Transport::Playing(_) => {
                debug!("playback already running");
                return Ok(false);
            }
            Transport::Idle => {}
        }
        if self.melody.is_empty() {
            return Ok(false);
        }
        let schedule = PlaybackSchedule::from_melody(&self.melody, &self.config);
        info!(
            notes = schedule.len(),
            total_ms = schedule.total_ms(),
            "playback started"
        );
        self.transport = Transport::Playing(ActivePlayback {
            schedule,
            cursor: 0,
            next_at_ms: self.clock.now_ms(),
        });
        self.poll();
        Ok(true)
    }

    /// Empties the melody and ends any recording session. A running playback
    /// keeps going on its own snapshot.
    pub fn clear_melody(&mut self) {
        self.melody.clear();
        if self.is_recording() {
            self.transport = Transport::Idle;
        }
        debug!("melody cleared");
    }

    /// Fires every playback step that is due and lets the sink release finished
    /// tones. Returns the number of notes sounded.
    pub fn poll(&mut self) -> usize {
        self.sink.release();
        let mut fired = 0;
        loop {
            let now = self.clock.now_ms();
            let Transport::Playing(playback) = &mut self.transport else {
                break;
            };
            if now < playback.next_at_ms {
                break;
            }
            match playback.schedule.steps().get(playback.cursor).copied() {
                Some(step) => {
                    playback.cursor += 1;
                    playback.next_at_ms += step.delay_ms;
                    self.sound(step.pitch);
                    fired += 1;
                }
                None => {
                    self.transport = Transport::Idle;
                    info!("playback finished");
                }
            }
        }
        fired
    }

    /// Clock time at which [`poll`](Self::poll) has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        match &self.transport {
            Transport::Playing(playback) => Some(playback.next_at_ms),
            _ => None,
        }
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline().map(|deadline| {
            Duration::from_millis(deadline.saturating_sub(self.clock.now_ms()))
        })
    }

    fn sound(&mut self, pitch: Pitch) {
        let tone = Tone::new(pitch, self.config.envelope());
        self.sink.play(&tone);
        if let Some(listener) = self.listener.as_mut() {
            listener(pitch);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;
    use pianotes_audio::MemorySink;

    fn recorder() -> (ManualClock, MelodyRecorder<ManualClock, MemorySink>) {
        let clock = ManualClock::new();
        let recorder =
            MelodyRecorder::new(clock.clone(), MemorySink::new(), PlaybackConfig::default());
        (clock, recorder)
    }

    fn played(recorder: &MelodyRecorder<ManualClock, MemorySink>) -> Vec<Pitch> {
        recorder.sink().played().iter().map(|t| t.pitch).collect()
    }

    fn record(
        clock: &ManualClock,
        recorder: &mut MelodyRecorder<ManualClock, MemorySink>,
        presses: &[(Pitch, u64)],
    ) {
        let start = clock.now_ms();
        recorder.start_recording().unwrap();
        for &(pitch, offset) in presses {
            clock.set(start + offset);
            recorder.press_key(pitch);
        }
        recorder.stop_recording();
        recorder.sink_mut().take();
    }

    #[test]
    fn records_offsets_since_start() {
        let (clock, mut recorder) = recorder();
        clock.set(1_000);
        recorder.start_recording().unwrap();
        for (step, pitch) in [Pitch::C, Pitch::D, Pitch::D, Pitch::F].into_iter().enumerate() {
            clock.set(1_000 + step as u64 * 120);
            recorder.press_key(pitch);
        }
        let offsets: Vec<_> = recorder.melody().events().iter().map(|e| e.offset_ms).collect();
        assert_eq!(offsets, vec![0, 120, 240, 360]);
        assert_eq!(played(&recorder).len(), 4);
    }

    #[test]
    fn key_presses_sound_without_recording() {
        let (_clock, mut recorder) = recorder();
        recorder.press_key(Pitch::A);
        assert_eq!(played(&recorder), vec![Pitch::A]);
        assert!(recorder.melody().is_empty());
    }

    #[test]
    fn start_recording_replaces_melody() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::C, 0), (Pitch::D, 10)]);
        assert_eq!(recorder.melody().len(), 2);
        recorder.start_recording().unwrap();
        assert!(recorder.melody().is_empty());
        assert!(recorder.is_recording());
    }

    #[test]
    fn stop_recording_is_idempotent() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::E, 0)]);
        assert!(!recorder.stop_recording());
        assert!(!recorder.stop_recording());
        assert_eq!(recorder.state(), TransportState::Idle);
        assert_eq!(recorder.melody().len(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let (clock, mut recorder) = recorder();
        recorder.start_recording().unwrap();
        clock.advance(50);
        recorder.press_key(Pitch::G);
        recorder.clear_melody();
        assert!(recorder.melody().is_empty());
        assert!(!recorder.is_recording());

        recorder.clear_melody();
        assert!(recorder.melody().is_empty());
        assert_eq!(recorder.state(), TransportState::Idle);
    }

    #[test]
    fn empty_melody_play_is_noop() {
        let (_clock, mut recorder) = recorder();
        assert_eq!(recorder.play_melody(), Ok(false));
        assert!(!recorder.is_playing());
        assert!(played(&recorder).is_empty());
        assert_eq!(recorder.next_deadline(), None);
    }

    #[test]
    fn replays_with_recorded_spacing() {
        let (clock, mut recorder) = recorder();
        record(
            &clock,
            &mut recorder,
            &[(Pitch::C, 0), (Pitch::E, 500), (Pitch::G, 1300)],
        );
        clock.set(10_000);
        assert_eq!(recorder.play_melody(), Ok(true));
        assert_eq!(played(&recorder), vec![Pitch::C]);

        clock.set(10_499);
        assert_eq!(recorder.poll(), 0);
        clock.set(10_500);
        assert_eq!(recorder.poll(), 1);
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::E]);

        clock.set(11_299);
        assert_eq!(recorder.poll(), 0);
        clock.set(11_300);
        assert_eq!(recorder.poll(), 1);
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::E, Pitch::G]);

        clock.set(11_599);
        recorder.poll();
        assert!(recorder.is_playing());
        clock.set(11_600);
        recorder.poll();
        assert!(!recorder.is_playing());
        assert_eq!(played(&recorder).len(), 3);
    }

    #[test]
    fn identical_offsets_are_spaced_by_floor() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::C, 200), (Pitch::D, 200)]);
        recorder.play_melody().unwrap();
        assert_eq!(recorder.time_until_next(), Some(Duration::from_millis(100)));
        clock.advance(99);
        assert_eq!(recorder.poll(), 0);
        clock.advance(1);
        assert_eq!(recorder.poll(), 1);
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::D]);
    }

    #[test]
    fn single_note_waits_for_tail() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::B, 40)]);
        recorder.play_melody().unwrap();
        clock.advance(299);
        recorder.poll();
        assert!(recorder.is_playing());
        clock.advance(1);
        recorder.poll();
        assert!(!recorder.is_playing());
        assert_eq!(played(&recorder), vec![Pitch::B]);
    }

    #[test]
    fn replay_while_playing_does_not_start_second_pass() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::C, 0), (Pitch::D, 200)]);
        recorder.play_melody().unwrap();
        assert_eq!(recorder.play_melody(), Ok(false));
        clock.advance(1_000);
        recorder.poll();
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::D]);
        assert!(!recorder.is_playing());
    }

    #[test]
    fn recording_and_playback_are_exclusive() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::C, 0)]);
        recorder.play_melody().unwrap();
        assert_eq!(
            recorder.start_recording(),
            Err(RecorderError::PlaybackInProgress)
        );
        assert_eq!(recorder.melody().len(), 1);

        clock.advance(300);
        recorder.poll();
        recorder.start_recording().unwrap();
        assert_eq!(
            recorder.play_melody(),
            Err(RecorderError::RecordingInProgress)
        );
    }

    #[test]
    fn clear_during_playback_keeps_snapshot() {
        let (clock, mut recorder) = recorder();
        record(
            &clock,
            &mut recorder,
            &[(Pitch::C, 0), (Pitch::D, 100), (Pitch::E, 200)],
        );
        recorder.play_melody().unwrap();
        recorder.clear_melody();
        assert!(recorder.melody().is_empty());
        assert!(recorder.is_playing());
        clock.advance(500);
        assert_eq!(recorder.poll(), 2);
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::D, Pitch::E]);
        assert!(!recorder.is_playing());
    }

    #[test]
    fn late_poll_catches_up_in_order() {
        let (clock, mut recorder) = recorder();
        record(
            &clock,
            &mut recorder,
            &[(Pitch::C, 0), (Pitch::D, 150), (Pitch::E, 300)],
        );
        recorder.play_melody().unwrap();
        clock.advance(5_000);
        assert_eq!(recorder.poll(), 2);
        assert_eq!(played(&recorder), vec![Pitch::C, Pitch::D, Pitch::E]);
        assert!(!recorder.is_playing());
    }

    #[test]
    fn listener_sees_live_and_replayed_notes() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let sink = heard.clone();
        let clock = ManualClock::new();
        let mut recorder =
            MelodyRecorder::new(clock.clone(), MemorySink::new(), PlaybackConfig::default())
                .with_listener(Box::new(move |pitch| sink.borrow_mut().push(pitch)));
        recorder.start_recording().unwrap();
        recorder.press_key(Pitch::F);
        recorder.stop_recording();
        recorder.play_melody().unwrap();
        assert_eq!(*heard.borrow(), vec![Pitch::F, Pitch::F]);
    }

    #[test]
    fn tones_use_configured_envelope() {
        let clock = ManualClock::new();
        let config = PlaybackConfig {
            tone_ms: 250,
            ..Default::default()
        };
        let mut recorder = MelodyRecorder::new(clock, MemorySink::new(), config);
        recorder.press_key(Pitch::A);
        let tone = recorder.sink().played()[0];
        assert_eq!(tone.envelope.duration, Duration::from_millis(250));
        assert_eq!(tone.frequency_hz, 440.0);
    }

    #[test]
    fn load_melody_rejected_while_recording() {
        let (_clock, mut recorder) = recorder();
        recorder.start_recording().unwrap();
        assert_eq!(
            recorder.load_melody(Melody::new()),
            Err(RecorderError::RecordingInProgress)
        );
    }

    #[test]
    fn poll_releases_finished_tones() {
        let (clock, mut recorder) = recorder();
        record(&clock, &mut recorder, &[(Pitch::D, 0)]);
        let before = recorder.sink().releases();
        recorder.play_melody().unwrap();
        clock.advance(300);
        recorder.poll();
        assert!(!recorder.is_playing());
        assert_eq!(recorder.sink().releases(), before + 2);
        recorder.poll();
        assert_eq!(recorder.sink().releases(), before + 3);
    }
}
