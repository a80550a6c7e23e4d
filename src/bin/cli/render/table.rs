use tutorly_lib::list::{ListView, Pagination};
use tutorly_lib::models::{
    Answer, Lesson, LessonContent, Matrix, MatrixDetail, Quiz, QuizAttempt, Student, Teacher, Unit,
};

use super::terminal::{paint, truncate, Color};

/// Widest a column may grow
const MAX_WIDTH: usize = 40;

/// A record that prints as one table row
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

impl Tabular for Lesson {
    fn headers() -> &'static [&'static str] {
        &["Id", "Title", "Level", "Skill", "Minutes", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.level.clone(),
            self.skill.clone(),
            self.duration.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Quiz {
    fn headers() -> &'static [&'static str] {
        &["Id", "Title", "Level", "Skill", "Minutes", "Score", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.level.clone(),
            self.skill.clone(),
            self.duration.to_string(),
            number(self.total_score),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Matrix {
    fn headers() -> &'static [&'static str] {
        &["Id", "Name", "Level", "Skill", "Questions", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.level.clone(),
            self.skill.clone(),
            self.total_question.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Unit {
    fn headers() -> &'static [&'static str] {
        &["Id", "Name", "Level", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.level.clone(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Student {
    fn headers() -> &'static [&'static str] {
        &["Id", "Name", "Email", "Phone", "Level", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.full_name.clone(),
            self.email.clone(),
            opt(&self.phone_number),
            self.level.clone(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Teacher {
    fn headers() -> &'static [&'static str] {
        &["Id", "Name", "Email", "Phone", "Specialization", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.full_name.clone(),
            self.email.clone(),
            opt(&self.phone_number),
            opt(&self.specialization),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Answer {
    fn headers() -> &'static [&'static str] {
        &["Id", "Quiz", "Content", "Correct", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.quiz_id.clone(),
            self.content.clone(),
            if self.is_correct { "yes" } else { "no" }.to_string(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for LessonContent {
    fn headers() -> &'static [&'static str] {
        &["Id", "Lesson", "#", "Title", "Type", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.lesson_id.clone(),
            self.position.to_string(),
            self.title.clone(),
            self.content_type.clone(),
            self.status.to_string(),
        ]
    }
}

impl Tabular for MatrixDetail {
    fn headers() -> &'static [&'static str] {
        &["Id", "Matrix", "Skill", "Level", "Questions", "Score"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.matrix_id.clone(),
            self.skill.clone(),
            self.level.clone(),
            self.question_count.to_string(),
            number(self.score),
        ]
    }
}

impl Tabular for QuizAttempt {
    fn headers() -> &'static [&'static str] {
        &["Id", "Quiz", "Student", "Score", "Started", "Submitted"]
    }

    fn row(&self) -> Vec<String> {
        let time = |t: &Option<chrono::DateTime<chrono::Utc>>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default()
        };
        vec![
            self.id.clone(),
            self.quiz_id.clone(),
            self.student_id.clone(),
            number(self.score),
            time(&self.started_time),
            time(&self.submitted_time),
        ]
    }
}

/// Lay rows out under their headers, one line each
pub fn format_table<T: Tabular>(items: &[T]) -> Vec<String> {
    let headers = T::headers();
    let rows: Vec<Vec<String>> = items.iter().map(Tabular::row).collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_WIDTH)
        })
        .collect();

    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", truncate(cell, *w), w = *w))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.iter().map(|h| h.to_string()).collect()));
    lines.push(
        widths
            .iter()
            .map(|w| "\u{2500}".repeat(*w))
            .collect::<Vec<_>>()
            .join(" "),
    );
    lines.extend(rows.into_iter().map(line));
    lines
}

/// "Page 2 of 5 (48 total)  < prev | next >"
pub fn format_pagination(pagination: &Pagination) -> String {
    let mut controls = Vec::new();
    if let Some(prev) = pagination.prev {
        controls.push(format!("< prev (--page {})", prev));
    }
    if let Some(next) = pagination.next {
        controls.push(format!("next > (--page {})", next));
    }

    let summary = format!(
        "Page {} of {} ({} total)",
        pagination.current_page, pagination.total_pages, pagination.total_count
    );
    if controls.is_empty() {
        summary
    } else {
        format!("{}  {}", summary, controls.join(" | "))
    }
}

pub fn print_list<T: Tabular>(view: &ListView<'_, T>, use_color: bool) {
    if let Some(message) = view.empty_message {
        println!("{}", paint(message, Color::DIM, use_color));
        return;
    }

    let mut lines = format_table(view.items).into_iter();
    if let Some(header) = lines.next() {
        println!("{}", paint(&header, Color::BOLD, use_color));
    }
    for line in lines {
        println!("{}", line);
    }

    if let Some(pagination) = &view.pagination {
        println!("\n{}", format_pagination(pagination));
    }
}
