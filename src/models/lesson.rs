use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::Resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub skill: String,
    /// Length in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonForm {
    pub title: String,
    pub level: String,
    pub skill: String,
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Status,
}

impl Validate for LessonForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("title", "Title", &self.title)
            .required("level", "Level", &self.level)
            .required("skill", "Skill", &self.skill)
            .positive("duration", "Duration", f64::from(self.duration))
            .finish()
    }
}

pub struct Lessons;

impl Resource for Lessons {
    const PATH: &'static str = "lessons";
    const LABEL: &'static str = "Lesson";

    type Entity = Lesson;
    type Form = LessonForm;

    fn id(entity: &Lesson) -> &str {
        &entity.id
    }

    fn to_form(entity: &Lesson) -> LessonForm {
        LessonForm {
            title: entity.title.clone(),
            level: entity.level.clone(),
            skill: entity.skill.clone(),
            duration: entity.duration,
            description: entity.description.clone(),
            status: entity.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_lesson() {
        let lesson: Lesson = serde_json::from_value(json!({
            "id": "0b6f7c1e-2f4a-4d52-9a43-5d8c2f0e1a11",
            "title": "Present simple",
            "level": "A1",
            "skill": "Grammar",
            "duration": 45,
            "status": "1",
            "createdBy": "admin",
            "createdTime": "2026-03-01T09:30:00Z",
            "updatedBy": null,
            "updatedTime": null
        }))
        .unwrap();

        assert_eq!(lesson.duration, 45);
        assert!(lesson.status.is_active());
        assert_eq!(lesson.audit.created_by.as_deref(), Some("admin"));
        assert!(!lesson.audit.was_updated());
    }

    #[test]
    fn test_form_payload_shape() {
        let form = LessonForm {
            title: "Past tense".into(),
            level: "A2".into(),
            skill: "Grammar".into(),
            duration: 30,
            description: None,
            status: Status::Inactive,
        };
        assert_eq!(
            serde_json::to_value(&form).unwrap(),
            json!({ "title": "Past tense", "level": "A2", "skill": "Grammar", "duration": 30, "status": "0" })
        );
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_default_form_is_invalid() {
        let fields: Vec<&str> = LessonForm::default().validate().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "level", "skill", "duration"]);
    }
}
