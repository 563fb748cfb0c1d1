use thiserror::Error;

/// Rejected transport transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("cannot record while a melody is playing")]
    PlaybackInProgress,
    #[error("cannot play while recording")]
    RecordingInProgress,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid playback config: {0}")]
    Invalid(String),
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse json config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parse yaml config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
