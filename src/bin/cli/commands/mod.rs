pub mod auth;
pub mod delete;
pub mod form;
pub mod list;
pub mod quiz;
pub mod review;
pub mod show;

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::ResourceKind;

/// Run `$body` with `$r` bound to the marker type of `$kind`
macro_rules! with_resource {
    ($kind:expr, $r:ident => $body:expr) => {{
        match $kind {
            $crate::ResourceKind::Lessons => { type $r = tutorly_lib::models::Lessons; $body }
            $crate::ResourceKind::Quizzes => { type $r = tutorly_lib::models::Quizzes; $body }
            $crate::ResourceKind::Matrices => { type $r = tutorly_lib::models::Matrices; $body }
            $crate::ResourceKind::Units => { type $r = tutorly_lib::models::Units; $body }
            $crate::ResourceKind::Students => { type $r = tutorly_lib::models::Students; $body }
            $crate::ResourceKind::Teachers => { type $r = tutorly_lib::models::Teachers; $body }
            $crate::ResourceKind::Answers => { type $r = tutorly_lib::models::Answers; $body }
            $crate::ResourceKind::LessonContents => { type $r = tutorly_lib::models::LessonContents; $body }
            $crate::ResourceKind::MatrixDetails => { type $r = tutorly_lib::models::MatrixDetails; $body }
            $crate::ResourceKind::QuizAttempts => { type $r = tutorly_lib::models::QuizAttempts; $body }
        }
    }};
}

/// Like `with_resource!`, for resources that belong to a parent
macro_rules! with_child_resource {
    ($kind:expr, $r:ident => $body:expr, else => $other:expr) => {{
        match $kind {
            $crate::ResourceKind::Answers => { type $r = tutorly_lib::models::Answers; $body }
            $crate::ResourceKind::LessonContents => { type $r = tutorly_lib::models::LessonContents; $body }
            $crate::ResourceKind::MatrixDetails => { type $r = tutorly_lib::models::MatrixDetails; $body }
            $crate::ResourceKind::QuizAttempts => { type $r = tutorly_lib::models::QuizAttempts; $body }
            _ => $other,
        }
    }};
}

pub(crate) use with_child_resource;
pub(crate) use with_resource;

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = with_resource!(*self, R => <R as tutorly_lib::api::Resource>::PATH);
        f.write_str(name)
    }
}

/// Prompt on stderr and read one line from stdin
pub fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    std::io::stderr().flush().ok();

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if line.is_empty() {
        bail!("No input for {}", label.to_lowercase());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
