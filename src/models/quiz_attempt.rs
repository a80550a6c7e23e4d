use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::{ChildResource, Resource};

/// A student's attempt at a quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub started_time: Option<DateTime<Utc>>,
    /// Null while the attempt is in progress
    #[serde(default)]
    pub submitted_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

impl QuizAttempt {
    pub fn is_submitted(&self) -> bool {
        self.submitted_time.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptForm {
    pub quiz_id: String,
    pub student_id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for QuizAttemptForm {
    fn validate(&self) -> Vec<FieldError> {
        let mut checks = Checks::new();
        checks
            .required("quizId", "Quiz", &self.quiz_id)
            .required("studentId", "Student", &self.student_id)
            .non_negative("score", "Score", self.score);
        let mut errors = checks.finish();

        if let (Some(started), Some(submitted)) = (self.started_time, self.submitted_time) {
            if submitted < started {
                errors.push(FieldError {
                    field: "submittedTime",
                    message: "Submitted time cannot be before the start time".to_string(),
                });
            }
        }
        errors
    }
}

pub struct QuizAttempts;

impl Resource for QuizAttempts {
    const PATH: &'static str = "quiz-attempts";
    const LABEL: &'static str = "Quiz attempt";

    type Entity = QuizAttempt;
    type Form = QuizAttemptForm;

    fn id(entity: &QuizAttempt) -> &str {
        &entity.id
    }

    fn to_form(entity: &QuizAttempt) -> QuizAttemptForm {
        QuizAttemptForm {
            quiz_id: entity.quiz_id.clone(),
            student_id: entity.student_id.clone(),
            score: entity.score,
            started_time: entity.started_time,
            submitted_time: entity.submitted_time,
            status: entity.status,
        }
    }

    fn destination(form: &QuizAttemptForm) -> String {
        Self::parent_destination(form)
    }
}

impl ChildResource for QuizAttempts {
    const PARENT_FIELD: &'static str = "quizId";
    const PARENT_PATH: &'static str = "quizzes";

    fn parent_id(entity: &QuizAttempt) -> &str {
        &entity.quiz_id
    }

    fn form_parent_id(form: &QuizAttemptForm) -> &str {
        &form.quiz_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_submitted_before_start_rejected() {
        let now = Utc::now();
        let form = QuizAttemptForm {
            quiz_id: "q1".into(),
            student_id: "s1".into(),
            score: 7.5,
            started_time: Some(now),
            submitted_time: Some(now - Duration::minutes(5)),
            status: Status::Active,
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "submittedTime");
    }
}
