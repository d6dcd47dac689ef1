use serde::Deserialize;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{one_of, optional, order_index, required_id},
    },
    model::entity::{COURSE_LEVELS, CourseCreate},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseForm {
    pub language_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    /// `beginner`, `intermediate` or `advanced`
    pub level: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[schema(value_type = Option<i64>)]
    pub order_index: Option<FormNumber>,
}

impl CourseForm {
    pub fn validate(self) -> Result<CourseCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let language_id = required_id(&mut errors, "language_id", self.language_id);
        let title = errors.required("title", &self.title);
        let level = one_of(&mut errors, "level", self.level.as_deref(), &COURSE_LEVELS);
        errors.finish()?;

        Ok(CourseCreate {
            language_id,
            title,
            description: optional(self.description),
            level,
            is_published: self.is_published,
            order_index: order_index(self.order_index.as_ref()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied() {
        let form: CourseForm = serde_json::from_value(json!({
            "language_id": Uuid::new_v4(),
            "title": "Basics 1",
            "order_index": "-2",
        }))
        .unwrap();
        let data = form.validate().unwrap();
        assert_eq!(data.level, "beginner");
        assert_eq!(data.order_index, 0);
        assert!(!data.is_published);
    }

    #[test]
    fn unknown_level_rejected() {
        let form: CourseForm = serde_json::from_value(json!({
            "language_id": Uuid::new_v4(),
            "title": "Basics 1",
            "level": "expert",
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "level");
    }
}
