pub mod analytics;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod midi;
pub mod quiz;
pub mod recorder;
pub mod schedule;

pub use analytics::FeedbackReport;
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::PlaybackConfig;
pub use driver::drive_playback;
pub use error::{ConfigError, RecorderError};
pub use midi::{MidiDevice, MidiManager};
pub use quiz::{AnswerFeedback, ExerciseSession, KeyQuiz};
pub use recorder::{MelodyRecorder, NoteListener, TransportState};
pub use schedule::{PlaybackSchedule, PlaybackStep};
