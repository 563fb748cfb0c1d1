use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AdaptiveLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl AdaptiveLevel {
    pub fn label(self) -> &'static str {
        match self {
            AdaptiveLevel::Beginner => "Beginner",
            AdaptiveLevel::Intermediate => "Intermediate",
            AdaptiveLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PerformanceTier {
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl PerformanceTier {
    pub fn from_accuracy(percent: u32) -> Self {
        match percent {
            90.. => PerformanceTier::Excellent,
            70..=89 => PerformanceTier::Good,
            50..=69 => PerformanceTier::Fair,
            _ => PerformanceTier::NeedsPractice,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent!",
            PerformanceTier::Good => "Good!",
            PerformanceTier::Fair => "Not bad",
            PerformanceTier::NeedsPractice => "Needs practice",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Recommendation {
    LevelUp,
    ReviewTheory,
    KeepGoing,
}

impl Recommendation {
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::LevelUp => {
                "You are doing great! Try the next difficulty level."
            }
            Recommendation::ReviewTheory => {
                "This material seems hard. Go back to the theory or lower the level."
            }
            Recommendation::KeepGoing => "Keep it up! The current level suits you.",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PracticeStats {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub current_streak: u32,
    pub minutes_spent: u32,
    pub adaptive_level: AdaptiveLevel,
}

impl PracticeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(&mut self, correct: bool) {
        self.total_questions += 1;
        if correct {
            self.correct_answers += 1;
            self.current_streak += 1;
        } else {
            self.current_streak = 0;
        }
    }

    /// Rounded percentage of correct answers; zero before any answer.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.correct_answers as f64 / self.total_questions as f64 * 100.0).round() as u32
    }

    pub fn performance(&self) -> PerformanceTier {
        PerformanceTier::from_accuracy(self.accuracy_percent())
    }

    pub fn recommendation(&self) -> Recommendation {
        let accuracy = self.accuracy_percent();
        if accuracy >= 85 && self.current_streak >= 3 {
            Recommendation::LevelUp
        } else if accuracy < 50 && self.total_questions >= 5 {
            Recommendation::ReviewTheory
        } else {
            Recommendation::KeepGoing
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub level: u32,
    pub experience: u32,
    pub max_experience: u32,
    pub badges: Vec<String>,
    pub lessons_completed: u32,
    pub adaptive_level: AdaptiveLevel,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: 1,
            experience: 0,
            max_experience: 1000,
            badges: Vec::new(),
            lessons_completed: 0,
            adaptive_level: AdaptiveLevel::Beginner,
        }
    }

    /// Upper-cased first character of the name, used as an avatar.
    pub fn initial(&self) -> Option<String> {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }

    pub fn experience_percent(&self) -> f32 {
        if self.max_experience == 0 {
            return 0.0;
        }
        self.experience as f32 / self.max_experience as f32 * 100.0
    }

    pub fn badge_count(&self) -> usize {
        self.badges.len()
    }
}
