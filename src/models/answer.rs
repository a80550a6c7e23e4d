use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::{ChildResource, Resource};

/// One answer option of a quiz question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub quiz_id: String,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerForm {
    pub quiz_id: String,
    pub content: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub status: Status,
}

impl Validate for AnswerForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("quizId", "Quiz", &self.quiz_id)
            .required("content", "Content", &self.content)
            .finish()
    }
}

pub struct Answers;

impl Resource for Answers {
    const PATH: &'static str = "answers";
    const LABEL: &'static str = "Answer";

    type Entity = Answer;
    type Form = AnswerForm;

    fn id(entity: &Answer) -> &str {
        &entity.id
    }

    fn to_form(entity: &Answer) -> AnswerForm {
        AnswerForm {
            quiz_id: entity.quiz_id.clone(),
            content: entity.content.clone(),
            is_correct: entity.is_correct,
            status: entity.status,
        }
    }

    fn destination(form: &AnswerForm) -> String {
        Self::parent_destination(form)
    }
}

impl ChildResource for Answers {
    const PARENT_FIELD: &'static str = "quizId";
    const PARENT_PATH: &'static str = "quizzes";

    fn parent_id(entity: &Answer) -> &str {
        &entity.quiz_id
    }

    fn form_parent_id(form: &AnswerForm) -> &str {
        &form.quiz_id
    }
}
