//! Taking a quiz locally
//!
//! Progress is written to `quiz:{id}:state` after every answer so an
//! interrupted attempt can be resumed. Submitting scores the attempt, stores
//! it under `quiz:{id}:result` and drops the in-progress state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{keys, LocalStore, StorageError};

#[derive(Error, Debug)]
pub enum QuizRunError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    #[error("Question {question} has no option {option}")]
    InvalidOption { question: String, option: usize },

    #[error("Quiz has already been submitted")]
    AlreadySubmitted,

    #[error("Invalid quiz: {0}")]
    InvalidQuiz(String),
}

pub type Result<T> = std::result::Result<T, QuizRunError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_option: usize,
    #[serde(default = "default_points")]
    pub points: f64,
}

fn default_points() -> f64 {
    1.0
}

/// A quiz file as read by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalQuiz {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

impl LocalQuiz {
    pub fn max_score(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }

    /// Every question needs options, an in-range answer and a unique id
    pub fn check(&self) -> Result<()> {
        if self.questions.is_empty() {
            return Err(QuizRunError::InvalidQuiz(format!("quiz {} has no questions", self.id)));
        }
        let mut seen = std::collections::HashSet::new();
        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                return Err(QuizRunError::InvalidQuiz(format!("question {} appears twice", question.id)));
            }
            if question.options.is_empty() {
                return Err(QuizRunError::InvalidQuiz(format!("question {} has no options", question.id)));
            }
            if question.correct_option >= question.options.len() {
                return Err(QuizRunError::InvalidQuiz(format!(
                    "question {} marks option {} correct but has {}",
                    question.id,
                    question.correct_option,
                    question.options.len()
                )));
            }
        }
        Ok(())
    }

    fn question(&self, id: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// In-progress answers, keyed by question id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    /// Local id of this attempt, carried into the result
    pub attempt_id: Uuid,
    pub quiz_id: String,
    pub answers: BTreeMap<String, usize>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub attempt_id: Uuid,
    pub quiz_id: String,
    pub score: f64,
    pub max_score: f64,
    pub correct: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}

pub struct QuizRun {
    quiz: LocalQuiz,
    store: LocalStore,
    progress: QuizProgress,
    result: Option<QuizResult>,
}

impl QuizRun {
    /// Fresh attempt; any saved progress for this quiz is discarded
    pub fn start(quiz: LocalQuiz, store: LocalStore, now: DateTime<Utc>) -> Result<Self> {
        quiz.check()?;
        store.remove(&keys::quiz_state(&quiz.id))?;
        let progress = QuizProgress {
            attempt_id: Uuid::new_v4(),
            quiz_id: quiz.id.clone(),
            answers: BTreeMap::new(),
            started_at: now,
        };
        Ok(Self {
            quiz,
            store,
            progress,
            result: None,
        })
    }

    /// Continue saved progress, or start fresh when there is none
    pub fn resume(quiz: LocalQuiz, store: LocalStore, now: DateTime<Utc>) -> Result<Self> {
        quiz.check()?;
        let saved: Option<QuizProgress> = store.get_json(&keys::quiz_state(&quiz.id))?;
        let Some(mut progress) = saved.filter(|p| p.quiz_id == quiz.id) else {
            return Self::start(quiz, store, now);
        };

        // Questions may have changed since the progress was saved
        progress.answers.retain(|id, option| {
            quiz.question(id).is_some_and(|q| *option < q.options.len())
        });
        log::info!(
            "Resuming quiz {} with {} answer(s)",
            quiz.id,
            progress.answers.len()
        );

        Ok(Self {
            quiz,
            store,
            progress,
            result: None,
        })
    }

    pub fn quiz(&self) -> &LocalQuiz {
        &self.quiz
    }

    pub fn progress(&self) -> &QuizProgress {
        &self.progress
    }

    pub fn answer_for(&self, question_id: &str) -> Option<usize> {
        self.progress.answers.get(question_id).copied()
    }

    /// Questions without an answer, in quiz order
    pub fn unanswered(&self) -> impl Iterator<Item = &QuizQuestion> {
        self.quiz
            .questions
            .iter()
            .filter(|q| !self.progress.answers.contains_key(&q.id))
    }

    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    pub fn answer(&mut self, question_id: &str, option: usize) -> Result<()> {
        if self.result.is_some() {
            return Err(QuizRunError::AlreadySubmitted);
        }
        let question = self
            .quiz
            .question(question_id)
            .ok_or_else(|| QuizRunError::UnknownQuestion(question_id.to_string()))?;
        if option >= question.options.len() {
            return Err(QuizRunError::InvalidOption {
                question: question_id.to_string(),
                option,
            });
        }

        self.progress.answers.insert(question_id.to_string(), option);
        self.store
            .set_json(&keys::quiz_state(&self.quiz.id), &self.progress)?;
        Ok(())
    }

    /// Score the attempt; unanswered questions count as wrong
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&QuizResult> {
        if self.result.is_some() {
            return Err(QuizRunError::AlreadySubmitted);
        }

        let mut score = 0.0;
        let mut correct = 0;
        for question in &self.quiz.questions {
            if self.progress.answers.get(&question.id) == Some(&question.correct_option) {
                score += question.points;
                correct += 1;
            }
        }

        let result = QuizResult {
            attempt_id: self.progress.attempt_id,
            quiz_id: self.quiz.id.clone(),
            score,
            max_score: self.quiz.max_score(),
            correct,
            total: self.quiz.questions.len(),
            started_at: self.progress.started_at,
            submitted_at: now,
        };

        self.store
            .set_json(&keys::quiz_result(&self.quiz.id), &result)?;
        self.store.remove(&keys::quiz_state(&self.quiz.id))?;
        log::info!(
            "Quiz {} submitted: {}/{}",
            self.quiz.id,
            result.score,
            result.max_score
        );

        Ok(&*self.result.insert(result))
    }
}

/// Last submitted result for a quiz
pub fn last_result(store: &LocalStore, quiz_id: &str) -> Result<Option<QuizResult>> {
    Ok(store.get_json::<QuizResult>(&keys::quiz_result(quiz_id))?)
}
