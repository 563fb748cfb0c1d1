use pianotes_domain::{AdaptiveLevel, PerformanceTier, PracticeStats, Recommendation};
use serde::{Deserialize, Serialize};

/// What the feedback panel shows for a set of practice statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackReport {
    pub accuracy_percent: u32,
    pub correct_answers: u32,
    pub current_streak: u32,
    pub minutes_spent: u32,
    pub performance: PerformanceTier,
    pub recommendation: Recommendation,
    pub adaptive_level: AdaptiveLevel,
}

impl FeedbackReport {
    pub fn from_stats(stats: &PracticeStats) -> Self {
        Self {
            accuracy_percent: stats.accuracy_percent(),
            correct_answers: stats.correct_answers,
            current_streak: stats.current_streak,
            minutes_spent: stats.minutes_spent,
            performance: stats.performance(),
            recommendation: stats.recommendation(),
            adaptive_level: stats.adaptive_level,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Accuracy {}% ({}), correct {}, streak {}, {} min, level {}\n{}",
            self.accuracy_percent,
            self.performance.label(),
            self.correct_answers,
            self.current_streak,
            self.minutes_spent,
            self.adaptive_level.label(),
            self.recommendation.message()
        )
    }
}
