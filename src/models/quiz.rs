use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub skill: String,
    /// Time limit in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizForm {
    pub title: String,
    pub level: String,
    pub skill: String,
    pub duration: u32,
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for QuizForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("title", "Title", &self.title)
            .required("level", "Level", &self.level)
            .required("skill", "Skill", &self.skill)
            .positive("duration", "Duration", f64::from(self.duration))
            .positive("totalScore", "Total score", self.total_score)
            .finish()
    }
}

pub struct Quizzes;

impl Resource for Quizzes {
    const PATH: &'static str = "quizzes";
    const LABEL: &'static str = "Quiz";

    type Entity = Quiz;
    type Form = QuizForm;

    fn id(entity: &Quiz) -> &str {
        &entity.id
    }

    fn to_form(entity: &Quiz) -> QuizForm {
        QuizForm {
            title: entity.title.clone(),
            level: entity.level.clone(),
            skill: entity.skill.clone(),
            duration: entity.duration,
            total_score: entity.total_score,
            description: entity.description.clone(),
            status: entity.status,
        }
    }
}
