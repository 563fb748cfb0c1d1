//! Built-in sample content for the learning dashboard.

use crate::lesson::{Difficulty, Exercise, Level, TheoryLesson};
use crate::progress::{AdaptiveLevel, UserProfile};

pub fn first_lesson() -> TheoryLesson {
    let paragraphs = [
        "Notes are symbols for the sounds of music. \
         The piano has 7 basic notes: Do, Re, Mi, Fa, Sol, La, Si.",
        "Every note matches a key on the keyboard. \
         White keys are the basic notes, black keys are the semitones.",
        "To start playing, remember where Do is: \
         the white key just left of a group of two black keys.",
    ];
    TheoryLesson::new(
        1,
        "Basics of note reading",
        paragraphs.iter().map(|p| p.to_string()).collect(),
        65,
    )
}

fn question(
    id: u32,
    question: &str,
    options: [&str; 4],
    correct_answer: usize,
    difficulty: Difficulty,
) -> Exercise {
    Exercise {
        id,
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
        difficulty,
    }
}

pub fn practice_questions() -> Vec<Exercise> {
    vec![
        question(
            1,
            "Which note sits left of a group of two black keys?",
            ["Do", "Re", "Mi", "Fa"],
            0,
            Difficulty::Easy,
        ),
        question(
            2,
            "How many basic notes are there in music?",
            ["5", "6", "7", "8"],
            2,
            Difficulty::Easy,
        ),
        question(
            3,
            "Which key colour marks the semitones?",
            ["White", "Black", "Grey", "Red"],
            1,
            Difficulty::Medium,
        ),
    ]
}

pub fn levels() -> Vec<Level> {
    vec![
        Level::new(
            1,
            "Meet the keys",
            Difficulty::Easy,
            3,
            false,
            "Where the notes are on the keyboard",
        ),
        Level::new(
            2,
            "Right hand: Do-Re-Mi",
            Difficulty::Easy,
            2,
            false,
            "First notes and fingering",
        ),
        Level::new(
            3,
            "Left hand: bass clef",
            Difficulty::Medium,
            1,
            false,
            "Reading notes in the bass clef",
        ),
        Level::new(
            4,
            "Both hands together",
            Difficulty::Medium,
            0,
            true,
            "Coordinating both hands",
        ),
        Level::new(
            5,
            "Simple melodies",
            Difficulty::Hard,
            0,
            true,
            "Playing well-known children's songs",
        ),
    ]
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Alex".to_string(),
        level: 3,
        experience: 450,
        max_experience: 1000,
        badges: vec!["trophy".to_string(), "star".to_string(), "piano".to_string()],
        lessons_completed: 12,
        adaptive_level: AdaptiveLevel::Beginner,
    }
}
