use pianotes_domain::{DomainError, Exercise, Pitch, PracticeStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// "Find this key" game on the virtual keyboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyQuiz {
    target: Pitch,
    score: u32,
}

impl KeyQuiz {
    pub fn new(target: Pitch) -> Self {
        Self { target, score: 0 }
    }

    pub fn target(&self) -> Pitch {
        self.target
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn retarget(&mut self, target: Pitch) {
        self.target = target;
    }

    /// Returns whether `pitch` was the target; a hit scores a point.
    pub fn press(&mut self, pitch: Pitch) -> bool {
        let hit = pitch == self.target;
        if hit {
            self.score += 1;
        }
        debug!(%pitch, target = %self.target, hit, score = self.score, "key quiz press");
        hit
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_index: usize,
}

/// Walks a list of multiple-choice exercises, tallying results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSession {
    exercises: Vec<Exercise>,
    current: usize,
    stats: PracticeStats,
}

impl ExerciseSession {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self::with_stats(exercises, PracticeStats::new())
    }

    pub fn with_stats(exercises: Vec<Exercise>, stats: PracticeStats) -> Self {
        Self {
            exercises,
            current: 0,
            stats,
        }
    }

    pub fn current(&self) -> Option<&Exercise> {
        self.exercises.get(self.current)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn stats(&self) -> &PracticeStats {
        &self.stats
    }

    pub fn into_stats(self) -> PracticeStats {
        self.stats
    }

    /// Whether the session sits on its last exercise.
    pub fn on_last(&self) -> bool {
        self.current + 1 >= self.exercises.len()
    }

    /// Scores `choice` against the current exercise and moves on; the last
    /// exercise stays current after being answered.
    pub fn answer(&mut self, choice: usize) -> Result<AnswerFeedback, DomainError> {
        let exercise = self
            .current()
            .ok_or_else(|| DomainError::validation("no exercises in session"))?;
        if choice >= exercise.options.len() {
            return Err(DomainError::validation(format!(
                "answer {} out of range for {} options",
                choice,
                exercise.options.len()
            )));
        }
        let feedback = AnswerFeedback {
            correct: exercise.is_correct(choice),
            correct_index: exercise.correct_answer,
        };
        let id = exercise.id;
        self.stats.record_answer(feedback.correct);
        info!(
            exercise = id,
            correct = feedback.correct,
            streak = self.stats.current_streak,
            "exercise answered"
        );
        if !self.on_last() {
            self.current += 1;
        }
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pianotes_domain::catalog;

    #[test]
    fn key_quiz_scores_hits() {
        let mut quiz = KeyQuiz::new(Pitch::E);
        assert!(!quiz.press(Pitch::D));
        assert!(quiz.press(Pitch::E));
        quiz.retarget(Pitch::ASharp);
        assert!(quiz.press(Pitch::ASharp));
        assert_eq!(quiz.score(), 2);
    }

    #[test]
    fn session_walks_questions_and_stops_on_last() {
        let mut session = ExerciseSession::new(catalog::practice_questions());
        let first = session.answer(0).unwrap();
        assert!(first.correct);
        assert_eq!(session.current_index(), 1);
        let second = session.answer(0).unwrap();
        assert!(!second.correct);
        assert_eq!(second.correct_index, 2);
        session.answer(1).unwrap();
        assert_eq!(session.current_index(), 2);
        session.answer(1).unwrap();
        assert_eq!(session.current_index(), 2);

        let stats = session.stats();
        assert_eq!(stats.total_questions, 4);
        assert_eq!(stats.correct_answers, 3);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut session = ExerciseSession::new(catalog::practice_questions());
        assert!(session.answer(9).is_err());
        assert_eq!(session.stats().total_questions, 0);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn empty_session_rejects_answers() {
        let mut session = ExerciseSession::new(Vec::new());
        assert!(session.current().is_none());
        assert!(session.answer(0).is_err());
    }
}
