use serde::Deserialize;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, one_of, optional, order_index, points, required_id},
    },
    model::entity::{LearningModuleCreate, MODULE_DIFFICULTIES},
};

pub const DEFAULT_MODULE_MINUTES: i32 = 10;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LearningModuleForm {
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    /// `easy`, `medium` or `hard`
    pub difficulty: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub estimated_minutes: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub points: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub order_index: Option<FormNumber>,
}

impl LearningModuleForm {
    pub fn validate(self) -> Result<LearningModuleCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let category_id = required_id(&mut errors, "category_id", self.category_id);
        let title = errors.required("title", &self.title);
        let difficulty = one_of(
            &mut errors,
            "difficulty",
            self.difficulty.as_deref(),
            &MODULE_DIFFICULTIES,
        );
        errors.finish()?;

        Ok(LearningModuleCreate {
            category_id,
            title,
            description: optional(self.description),
            difficulty,
            estimated_minutes: count(self.estimated_minutes.as_ref(), DEFAULT_MODULE_MINUTES),
            points: points(self.points.as_ref()),
            order_index: order_index(self.order_index.as_ref()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_fields_parsed_from_text() {
        let form: LearningModuleForm = serde_json::from_value(json!({
            "category_id": Uuid::new_v4(),
            "title": "Food",
            "difficulty": "Hard",
            "estimated_minutes": "15",
            "points": "0",
            "order_index": 3,
        }))
        .unwrap();
        let data = form.validate().unwrap();
        assert_eq!(data.difficulty, "hard");
        assert_eq!(data.estimated_minutes, 15);
        assert_eq!(data.points, 1);
        assert_eq!(data.order_index, 3);
    }
}
