use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherForm {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for TeacherForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("fullName", "Full name", &self.full_name)
            .email("email", &self.email)
            .phone("phoneNumber", self.phone_number.as_deref())
            .finish()
    }
}

pub struct Teachers;

impl Resource for Teachers {
    const PATH: &'static str = "teachers";
    const LABEL: &'static str = "Teacher";

    type Entity = Teacher;
    type Form = TeacherForm;

    fn id(entity: &Teacher) -> &str {
        &entity.id
    }

    fn to_form(entity: &Teacher) -> TeacherForm {
        TeacherForm {
            full_name: entity.full_name.clone(),
            email: entity.email.clone(),
            phone_number: entity.phone_number.clone(),
            specialization: entity.specialization.clone(),
            status: entity.status,
        }
    }
}
