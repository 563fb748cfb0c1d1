use tracing::debug;

use crate::synth::Tone;

/// Destination for synthesized tones. Playing is fire-and-forget: the call
/// must return without waiting for the tone to finish.
pub trait ToneSink {
    fn play(&mut self, tone: &Tone);

    /// Frees whatever is still held for tones that have finished sounding.
    fn release(&mut self) {}
}

impl<S: ToneSink + ?Sized> ToneSink for Box<S> {
    fn play(&mut self, tone: &Tone) {
        (**self).play(tone)
    }

    fn release(&mut self) {
        (**self).release()
    }
}

pub struct NullSink;

impl ToneSink for NullSink {
    fn play(&mut self, tone: &Tone) {
        debug!(pitch = %tone.pitch, "dropping tone on null sink");
    }
}

/// Keeps every tone it is asked to play, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    played: Vec<Tone>,
    releases: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[Tone] {
        &self.played
    }

    /// How many times the sink was asked to release finished tones.
    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn take(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.played)
    }
}

impl ToneSink for MemorySink {
    fn play(&mut self, tone: &Tone) {
        self.played.push(*tone);
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
