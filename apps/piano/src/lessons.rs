use anyhow::Result;
use pianotes_audio::ToneSink;
use pianotes_domain::{catalog, Exercise, Pitch};
use pianotes_tutor::{Clock, ExerciseSession, FeedbackReport, KeyQuiz, MelodyRecorder};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type Input = Lines<BufReader<Stdin>>;

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

pub fn show_lesson() {
    let profile = catalog::sample_profile();
    println!(
        "[{}] {}, level {}, {}/{} XP ({:.0}%), {} lessons, {} badges, {}",
        profile.initial().unwrap_or_default(),
        profile.name,
        profile.level,
        profile.experience,
        profile.max_experience,
        profile.experience_percent(),
        profile.lessons_completed,
        profile.badge_count(),
        profile.adaptive_level.label()
    );
    println!();

    let lesson = catalog::first_lesson();
    println!("== {} ({}% studied)", lesson.title, lesson.progress);
    for paragraph in &lesson.paragraphs {
        println!("{paragraph}");
    }
    let whites: Vec<_> = Pitch::white_keys().map(Pitch::solfege).collect();
    println!("Keyboard: {}", whites.join(" "));
    println!();

    println!("== Levels");
    for level in catalog::levels() {
        let stars = "*".repeat(level.stars as usize);
        let lock = if level.locked { " (locked)" } else { "" };
        println!(
            "{}. {} [{}] {:<3}{} - {}",
            level.id,
            level.title,
            level.difficulty.label(),
            stars,
            lock,
            level.description
        );
    }
}

fn parse_choice(input: &str, exercise: &Exercise) -> Option<usize> {
    let input = input.trim();
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).filter(|i| *i < exercise.options.len());
    }
    let mut chars = input.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    (0..exercise.options.len()).find(|i| Exercise::option_letter(*i) == letter)
}

pub async fn run_quiz() -> Result<()> {
    let questions = catalog::practice_questions();
    let total = questions.len();
    let mut session = ExerciseSession::new(questions);
    let mut lines = stdin_lines();

    for _ in 0..total {
        let Some(exercise) = session.current().cloned() else {
            break;
        };
        println!("\n[{}] {}", exercise.difficulty.label(), exercise.question);
        for (index, option) in exercise.options.iter().enumerate() {
            println!("  {}) {}", Exercise::option_letter(index), option);
        }
        let choice = loop {
            let Some(line) = lines.next_line().await? else {
                return finish(&session);
            };
            match parse_choice(&line, &exercise) {
                Some(choice) => break choice,
                None => println!("answer with a letter from the list"),
            }
        };
        let feedback = session.answer(choice)?;
        if feedback.correct {
            println!("Correct!");
        } else {
            println!(
                "Not quite, the answer was {}) {}",
                Exercise::option_letter(feedback.correct_index),
                exercise.options[feedback.correct_index]
            );
        }
    }
    finish(&session)
}

fn finish(session: &ExerciseSession) -> Result<()> {
    let report = FeedbackReport::from_stats(session.stats());
    println!("\n{}", report.summary());
    Ok(())
}

pub async fn run_key_quiz<C: Clock, S: ToneSink>(mut recorder: MelodyRecorder<C, S>) -> Result<()> {
    let targets: Vec<Pitch> = Pitch::white_keys().collect();
    let mut quiz = KeyQuiz::new(targets[0]);
    let mut lines = stdin_lines();

    for target in &targets {
        quiz.retarget(*target);
        println!("Find {} and type its letter name", target.solfege());
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.parse::<Pitch>() {
            Ok(pitch) => {
                recorder.press_key(pitch);
                if quiz.press(pitch) {
                    println!("Yes! Score {}", quiz.score());
                } else {
                    println!("That was {}, not {}", pitch.solfege(), target.solfege());
                }
            }
            Err(err) => println!("{err}"),
        }
    }
    println!("Final score {}/{}", quiz.score(), targets.len());
    Ok(())
}
