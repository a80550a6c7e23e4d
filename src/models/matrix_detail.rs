use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::{ChildResource, Resource};

/// One row of a matrix: question count and score for a skill/level pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixDetail {
    pub id: String,
    pub matrix_id: String,
    #[serde(default)]
    pub skill: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub question_count: u32,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixDetailForm {
    pub matrix_id: String,
    pub skill: String,
    pub level: String,
    pub question_count: u32,
    pub score: f64,
    #[serde(default)]
    pub status: Status,
}

impl Validate for MatrixDetailForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("matrixId", "Matrix", &self.matrix_id)
            .required("skill", "Skill", &self.skill)
            .required("level", "Level", &self.level)
            .positive("questionCount", "Question count", f64::from(self.question_count))
            .non_negative("score", "Score", self.score)
            .finish()
    }
}

pub struct MatrixDetails;

impl Resource for MatrixDetails {
    const PATH: &'static str = "matrix-details";
    const LABEL: &'static str = "Matrix detail";

    type Entity = MatrixDetail;
    type Form = MatrixDetailForm;

    fn id(entity: &MatrixDetail) -> &str {
        &entity.id
    }

    fn to_form(entity: &MatrixDetail) -> MatrixDetailForm {
        MatrixDetailForm {
            matrix_id: entity.matrix_id.clone(),
            skill: entity.skill.clone(),
            level: entity.level.clone(),
            question_count: entity.question_count,
            score: entity.score,
            status: entity.status,
        }
    }

    fn destination(form: &MatrixDetailForm) -> String {
        Self::parent_destination(form)
    }
}

impl ChildResource for MatrixDetails {
    const PARENT_FIELD: &'static str = "matrixId";
    const PARENT_PATH: &'static str = "matrices";

    fn parent_id(entity: &MatrixDetail) -> &str {
        &entity.matrix_id
    }

    fn form_parent_id(form: &MatrixDetailForm) -> &str {
        &form.matrix_id
    }
}
