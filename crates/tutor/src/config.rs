use std::path::Path;
use std::time::Duration;

use pianotes_audio::ToneEnvelope;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Timing and tone settings for the recorder.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Minimum wait between replayed notes.
    pub floor_ms: u64,
    /// Wait after the last replayed note.
    pub tail_ms: u64,
    pub tone_ms: u64,
    pub start_gain: f32,
    pub end_gain: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            floor_ms: 100,
            tail_ms: 300,
            tone_ms: 500,
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floor_ms == 0 {
            return Err(ConfigError::Invalid("floor_ms must be positive".into()));
        }
        if self.tone_ms == 0 {
            return Err(ConfigError::Invalid("tone_ms must be positive".into()));
        }
        if !(self.end_gain > 0.0 && self.start_gain <= 1.0) {
            return Err(ConfigError::Invalid("gains must lie in (0, 1]".into()));
        }
        if self.end_gain >= self.start_gain {
            return Err(ConfigError::Invalid("end_gain must be below start_gain".into()));
        }
        Ok(())
    }

    /// Loads a YAML (`.yaml`/`.yml`) or JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            _ => serde_json::from_str(&text)?,
        };
        config.validate()?;
        debug!(?config, path = %path.display(), "loaded playback config");
        Ok(config)
    }

    pub fn envelope(&self) -> ToneEnvelope {
        ToneEnvelope {
            duration: Duration::from_millis(self.tone_ms),
            start_gain: self.start_gain,
            end_gain: self.end_gain,
        }
    }
}
