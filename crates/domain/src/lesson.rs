use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TheoryLesson {
    pub id: u32,
    pub title: String,
    pub paragraphs: Vec<String>,
    /// Percentage of the lesson studied so far.
    pub progress: u8,
}

impl TheoryLesson {
    pub fn new(id: u32, title: impl Into<String>, paragraphs: Vec<String>, progress: u8) -> Self {
        Self {
            id,
            title: title.into(),
            paragraphs,
            progress: progress.min(100),
        }
    }

    pub fn complete(&mut self) {
        self.progress = 100;
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

/// A multiple-choice question.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub difficulty: Difficulty,
}

impl Exercise {
    pub fn new(
        id: u32,
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        difficulty: Difficulty,
    ) -> Result<Self, DomainError> {
        let exercise = Self {
            id,
            question: question.into(),
            options,
            correct_answer,
            difficulty,
        };
        exercise.validate()?;
        Ok(exercise)
    }

    /// Checks that there is a real choice and the answer points at an option.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.options.len() < 2 {
            return Err(DomainError::validation("an exercise needs at least two options"));
        }
        if self.correct_answer >= self.options.len() {
            return Err(DomainError::validation(format!(
                "correct answer {} out of range for {} options",
                self.correct_answer,
                self.options.len()
            )));
        }
        Ok(())
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }

    /// Letter shown next to an option: A, B, C...
    pub fn option_letter(index: usize) -> char {
        (b'A' + (index % 26) as u8) as char
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub id: u32,
    pub title: String,
    pub difficulty: Difficulty,
    /// Stars earned, 0 to 3.
    pub stars: u8,
    pub locked: bool,
    pub description: String,
}

impl Level {
    pub fn new(
        id: u32,
        title: impl Into<String>,
        difficulty: Difficulty,
        stars: u8,
        locked: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            difficulty,
            stars: stars.min(3),
            locked,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_validation() {
        let options = vec!["5".to_string(), "7".to_string()];
        assert!(Exercise::new(1, "q", options.clone(), 2, Difficulty::Easy).is_err());
        assert!(Exercise::new(1, "q", vec!["only".into()], 0, Difficulty::Easy).is_err());
        let exercise = Exercise::new(1, "q", options, 1, Difficulty::Easy).unwrap();
        assert!(exercise.is_correct(1));
        assert!(exercise.validate().is_ok());

        let mut broken = exercise.clone();
        broken.correct_answer = 2;
        assert!(broken.validate().is_err());
        assert!(!exercise.is_correct(0));
    }

    #[test]
    fn option_letters() {
        assert_eq!(Exercise::option_letter(0), 'A');
        assert_eq!(Exercise::option_letter(3), 'D');
    }

    #[test]
    fn lesson_progress_is_clamped() {
        let mut lesson = TheoryLesson::new(1, "t", Vec::new(), 150);
        assert_eq!(lesson.progress, 100);
        lesson.progress = 65;
        assert!(!lesson.is_complete());
        lesson.complete();
        assert!(lesson.is_complete());
    }
}
