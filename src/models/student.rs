use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub level: String,
    #[serde(default)]
    pub status: Status,
}

impl Validate for StudentForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("fullName", "Full name", &self.full_name)
            .email("email", &self.email)
            .phone("phoneNumber", self.phone_number.as_deref())
            .required("level", "Level", &self.level)
            .finish()
    }
}

pub struct Students;

impl Resource for Students {
    const PATH: &'static str = "students";
    const LABEL: &'static str = "Student";

    type Entity = Student;
    type Form = StudentForm;

    fn id(entity: &Student) -> &str {
        &entity.id
    }

    fn to_form(entity: &Student) -> StudentForm {
        StudentForm {
            full_name: entity.full_name.clone(),
            email: entity.email.clone(),
            phone_number: entity.phone_number.clone(),
            level: entity.level.clone(),
            status: entity.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_form_checks_contact_fields() {
        let form = StudentForm {
            full_name: "Linh Tran".into(),
            email: "linh.example.com".into(),
            phone_number: Some("abc".into()),
            level: "B1".into(),
            status: Status::Active,
        };

        let fields: Vec<&str> = form.validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["email", "phoneNumber"]);
    }
}
