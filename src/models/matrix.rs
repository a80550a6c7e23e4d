use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

/// Exam blueprint: how many questions of which skill and level a test draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub total_question: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixForm {
    pub name: String,
    pub level: String,
    pub skill: String,
    pub total_question: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for MatrixForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("name", "Name", &self.name)
            .required("level", "Level", &self.level)
            .required("skill", "Skill", &self.skill)
            .positive("totalQuestion", "Total questions", f64::from(self.total_question))
            .finish()
    }
}

pub struct Matrices;

impl Resource for Matrices {
    const PATH: &'static str = "matrices";
    const LABEL: &'static str = "Matrix";

    type Entity = Matrix;
    type Form = MatrixForm;

    fn id(entity: &Matrix) -> &str {
        &entity.id
    }

    fn to_form(entity: &Matrix) -> MatrixForm {
        MatrixForm {
            name: entity.name.clone(),
            level: entity.level.clone(),
            skill: entity.skill.clone(),
            total_question: entity.total_question,
            description: entity.description.clone(),
            status: entity.status,
        }
    }
}
