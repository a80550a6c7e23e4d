use serde::{Deserialize, Serialize};

use super::common::{Audit, Status};
use super::validation::{Checks, FieldError, Validate};
use crate::api::{ChildResource, Resource};

/// A block of material inside a lesson (text, a video link, an exercise)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    pub id: String,
    pub lesson_id: String,
    pub title: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    /// Display order inside the lesson
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub status: Status,
    #[serde(flatten)]
    pub audit: Audit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContentForm {
    pub lesson_id: String,
    pub title: String,
    pub content_type: String,
    pub content: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub status: Status,
}

impl Validate for LessonContentForm {
    fn validate(&self) -> Vec<FieldError> {
        Checks::new()
            .required("lessonId", "Lesson", &self.lesson_id)
            .required("title", "Title", &self.title)
            .required("contentType", "Content type", &self.content_type)
            .required("content", "Content", &self.content)
            .non_negative("position", "Position", f64::from(self.position))
            .finish()
    }
}

pub struct LessonContents;

impl Resource for LessonContents {
    const PATH: &'static str = "lesson-contents";
    const LABEL: &'static str = "Lesson content";

    type Entity = LessonContent;
    type Form = LessonContentForm;

    fn id(entity: &LessonContent) -> &str {
        &entity.id
    }

    fn to_form(entity: &LessonContent) -> LessonContentForm {
        LessonContentForm {
            lesson_id: entity.lesson_id.clone(),
            title: entity.title.clone(),
            content_type: entity.content_type.clone(),
            content: entity.content.clone(),
            position: entity.position,
            status: entity.status,
        }
    }

    fn destination(form: &LessonContentForm) -> String {
        Self::parent_destination(form)
    }
}

impl ChildResource for LessonContents {
    const PARENT_FIELD: &'static str = "lessonId";
    const PARENT_PATH: &'static str = "lessons";

    fn parent_id(entity: &LessonContent) -> &str {
        &entity.lesson_id
    }

    fn form_parent_id(form: &LessonContentForm) -> &str {
        &form.lesson_id
    }
}
