use serde::Deserialize;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, order_index, required_id},
    },
    model::entity::LessonCreate,
};

pub const DEFAULT_LESSON_MINUTES: i32 = 5;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LessonForm {
    pub course_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    /// Rich text (HTML subset produced by the formatting helper)
    #[serde(default)]
    pub content: String,
    #[schema(value_type = Option<i64>)]
    pub duration_minutes: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub order_index: Option<FormNumber>,
}

impl LessonForm {
    pub fn validate(self) -> Result<LessonCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let course_id = required_id(&mut errors, "course_id", self.course_id);
        let title = errors.required("title", &self.title);
        errors.finish()?;

        Ok(LessonCreate {
            course_id,
            title,
            content: self.content,
            duration_minutes: count(self.duration_minutes.as_ref(), DEFAULT_LESSON_MINUTES),
            order_index: order_index(self.order_index.as_ref()),
        })
    }
}
