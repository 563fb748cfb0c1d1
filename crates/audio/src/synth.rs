use std::f32::consts::PI;
use std::time::Duration;

use pianotes_domain::Pitch;
use serde::{Deserialize, Serialize};

/// Exponential gain ramp from `start_gain` towards `end_gain` over `duration`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToneEnvelope {
    pub duration: Duration,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Default for ToneEnvelope {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }
}

impl ToneEnvelope {
    /// Gain at `elapsed` into the tone; silent once the tone is over.
    pub fn gain_at(&self, elapsed: Duration) -> f32 {
        if elapsed >= self.duration || self.duration.is_zero() {
            return 0.0;
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.start_gain * (self.end_gain / self.start_gain).powf(progress)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tone {
    pub pitch: Pitch,
    pub frequency_hz: f32,
    pub envelope: ToneEnvelope,
}

impl Tone {
    pub fn new(pitch: Pitch, envelope: ToneEnvelope) -> Self {
        Self {
            pitch,
            frequency_hz: pitch.frequency(),
            envelope,
        }
    }

    pub fn sample_count(&self, sample_rate: u32) -> usize {
        (self.envelope.duration.as_secs_f64() * sample_rate as f64).round() as usize
    }

    /// Renders the enveloped sine wave as mono samples.
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        (0..self.sample_count(sample_rate))
            .map(|n| {
                let t = n as f32 / rate;
                let gain = self.envelope.gain_at(Duration::from_secs_f32(t));
                (2.0 * PI * self.frequency_hz * t).sin() * gain
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn envelope_decays_exponentially() {
        let envelope = ToneEnvelope::default();
        assert_relative_eq!(envelope.gain_at(Duration::ZERO), 0.3);
        let midway = envelope.gain_at(Duration::from_millis(250));
        assert_relative_eq!(midway, (0.3f32 * 0.01).sqrt(), epsilon = 1e-4);
        let near_end = envelope.gain_at(Duration::from_millis(499));
        assert!(near_end > 0.0 && near_end < 0.011);
        assert_eq!(envelope.gain_at(Duration::from_millis(500)), 0.0);
    }

    #[test]
    fn render_length_and_peak() {
        let tone = Tone::new(Pitch::A, ToneEnvelope::default());
        let samples = tone.render(48_000);
        assert_eq!(samples.len(), 24_000);
        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak <= 0.3 + 1e-6);
        assert!(peak > 0.25);
    }

    #[test]
    fn tone_uses_pitch_frequency() {
        let tone = Tone::new(Pitch::E, ToneEnvelope::default());
        assert_relative_eq!(tone.frequency_hz, 329.63);
    }
}
