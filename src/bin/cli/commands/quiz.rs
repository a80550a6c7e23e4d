use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use tutorly_lib::quiz_run::{last_result, LocalQuiz, QuizRun, QuizRunError};

use super::prompt;
use crate::app::App;
use crate::render::terminal::{paint, Color};

pub fn run(app: &App, quiz_path: &Path, restart: bool, use_color: bool) -> Result<()> {
    let raw = std::fs::read_to_string(quiz_path)
        .with_context(|| format!("Failed to read {}", quiz_path.display()))?;
    let quiz: LocalQuiz = serde_json::from_str(&raw).context("Quiz is not valid JSON")?;
    quiz.check()?;

    if let Some(previous) = last_result(&app.store, &quiz.id)? {
        println!(
            "{}",
            paint(
                &format!(
                    "Last attempt: {}/{} on {}",
                    previous.score,
                    previous.max_score,
                    previous.submitted_at.format("%Y-%m-%d")
                ),
                Color::DIM,
                use_color
            )
        );
    }

    let now = Utc::now();
    let mut run = if restart {
        QuizRun::start(quiz, app.store.clone(), now)?
    } else {
        QuizRun::resume(quiz, app.store.clone(), now)?
    };

    let title = run.quiz().title.clone();
    println!("{}", paint(&title, Color::BOLD, use_color));
    if !run.progress().answers.is_empty() {
        println!("Resuming with {} answer(s) saved.", run.progress().answers.len());
    }

    let pending: Vec<_> = run.unanswered().cloned().collect();
    for question in pending {
        println!("\n{}", question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        loop {
            let answer = prompt("Answer")?;
            match answer.trim().parse::<usize>() {
                Ok(n) if n >= 1 => match run.answer(&question.id, n - 1) {
                    Ok(()) => break,
                    Err(e @ QuizRunError::InvalidOption { .. }) => eprintln!("{}", e),
                    Err(e) => return Err(e).context("Failed to save the answer"),
                },
                _ => eprintln!("Enter the number of an option"),
            }
        }
    }

    let result = run.submit(Utc::now())?;
    let color = if result.correct * 2 >= result.total { Color::GREEN } else { Color::YELLOW };
    println!(
        "\n{}",
        paint(
            &format!(
                "Score: {}/{} ({} of {} correct)",
                result.score, result.max_score, result.correct, result.total
            ),
            color,
            use_color
        )
    );
    Ok(())
}
