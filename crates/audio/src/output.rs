use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use tracing::{debug, info, warn};

use crate::backend::ToneSink;
use crate::synth::Tone;

/// Extra time a stream is kept alive after its tone has been written.
const STREAM_GRACE: Duration = Duration::from_millis(50);

/// Plays tones on a cpal output device. Each tone gets its own short-lived
/// stream so overlapping notes mix on the device.
pub struct CpalSink {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    live: Vec<(cpal::Stream, Instant)>,
}

impl CpalSink {
    /// Opens the named output device, or the default one when `name` is `None`.
    pub fn open(name: Option<&str>) -> Result<Self> {
        let device = find_output_device_by_name(name)
            .ok_or_else(|| anyhow!("no audio output device available"))?;
        let config = device
            .default_output_config()
            .context("query default output config")?;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".into()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            "opened audio output"
        );
        Ok(Self {
            device,
            config,
            live: Vec::new(),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate().0
    }

    /// Streams still held open, including ones whose tone is fading out.
    pub fn live_streams(&self) -> usize {
        self.live.len()
    }

    fn start(&self, tone: &Tone) -> Result<cpal::Stream> {
        let samples: Arc<[f32]> = tone.render(self.sample_rate()).into();
        let config = self.config.config();
        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&self.device, &config, samples)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&self.device, &config, samples)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&self.device, &config, samples)?,
            other => return Err(anyhow!("unsupported sample format {other:?}")),
        };
        stream.play()?;
        Ok(stream)
    }
}

impl ToneSink for CpalSink {
    fn play(&mut self, tone: &Tone) {
        self.release();
        match self.start(tone) {
            Ok(stream) => {
                debug!(pitch = %tone.pitch, live = self.live.len(), "tone started");
                let until = Instant::now() + tone.envelope.duration + STREAM_GRACE;
                self.live.push((stream, until));
            }
            Err(err) => warn!(pitch = %tone.pitch, error = %err, "tone dropped"),
        }
    }

    fn release(&mut self) {
        let released = expire(&mut self.live, Instant::now());
        if released > 0 {
            debug!(released, live = self.live.len(), "audio streams closed");
        }
    }
}

/// Drops every entry whose deadline has passed and returns how many went.
fn expire<T>(live: &mut Vec<(T, Instant)>, now: Instant) -> usize {
    let before = live.len();
    live.retain(|(_, until)| *until > now);
    before - live.len()
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<[f32]>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut written = 0usize;
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            for frame in data.chunks_mut(channels) {
                let s = samples.get(written).copied().unwrap_or(0.0);
                for ch in frame {
                    *ch = <T as FromSample<f32>>::from_sample_(s);
                }
                written = written.saturating_add(1);
            }
        },
        |err| warn!(error = %err, "audio stream error"),
        None,
    )?;
    Ok(stream)
}

fn find_output_device_by_name(target: Option<&str>) -> Option<cpal::Device> {
    if let Some(target) = target {
        for host_id in cpal::available_hosts() {
            let Ok(host) = cpal::host_from_id(host_id) else {
                continue;
            };
            let Ok(devices) = host.output_devices() else {
                continue;
            };
            for device in devices {
                if device.name().map(|name| name == target).unwrap_or(false) {
                    return Some(device);
                }
            }
        }
        warn!(device = target, "output device not found, using default");
    }
    cpal::default_host().default_output_device()
}
