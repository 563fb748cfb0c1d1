pub mod catalog;
pub mod error;
pub mod io;
pub mod lesson;
pub mod melody;
pub mod pitch;
pub mod progress;

pub use crate::error::DomainError;
pub use crate::io::{ExportFormat, MelodyExporter};
pub use crate::lesson::{Difficulty, Exercise, Level, TheoryLesson};
pub use crate::melody::{Melody, RecordedEvent};
pub use crate::pitch::{frequency_for_name, KeyColor, Pitch};
pub use crate::progress::{
    AdaptiveLevel, PerformanceTier, PracticeStats, Recommendation, UserProfile,
};
