use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        exercise::{ExerciseContent, ExerciseEditor, ExerciseType},
        validate::{order_index, points, required_id},
    },
    model::entity::{Exercise, ExerciseCreate},
};

/// Exercise as submitted by the editor. `content` holds the active sub-form
/// only, without a type tag.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExerciseForm {
    pub module_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    /// `multiple_choice`, `matching` or `listening`
    #[serde(default)]
    pub exercise_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub content: Value,
    #[schema(value_type = Option<i64>)]
    pub points: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub order_index: Option<FormNumber>,
}

impl ExerciseForm {
    pub fn validate(self) -> Result<ExerciseCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let module_id = required_id(&mut errors, "module_id", self.module_id);
        let title = errors.required("title", &self.title);

        let content = match self.exercise_type.parse::<ExerciseType>() {
            Ok(kind) => match ExerciseContent::decode(kind, self.content) {
                Ok(mut content) => {
                    content.normalize_and_validate(&mut errors);
                    Some(content)
                }
                Err(e) => {
                    errors.add("content", format!("content does not match {kind}: {e}"));
                    None
                }
            },
            Err(e) => {
                errors.add("exercise_type", e.to_string());
                None
            }
        };
        errors.finish()?;

        // errors.finish() only passes when a sub-form was decoded
        let Some(content) = content else {
            return Err(vec![FieldError::new("content", "content is required")]);
        };

        Ok(ExerciseCreate {
            module_id,
            title,
            content,
            points: points(self.points.as_ref()),
            order_index: order_index(self.order_index.as_ref()),
        })
    }
}

/// Edit screen of one exercise: the row plus every sub-form.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ExerciseEditorResponse {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub points: i32,
    pub order_index: i32,
    pub editor: ExerciseEditor,
}

impl From<&Exercise> for ExerciseEditorResponse {
    fn from(exercise: &Exercise) -> Self {
        Self {
            id: exercise.id(),
            module_id: exercise.module_id(),
            title: exercise.title().to_string(),
            points: exercise.points(),
            order_index: exercise.order_index(),
            editor: exercise.editor(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn form(exercise_type: &str, content: Value) -> ExerciseForm {
        serde_json::from_value(json!({
            "module_id": Uuid::new_v4(),
            "title": "Pick the greeting",
            "exercise_type": exercise_type,
            "content": content,
            "points": "",
        }))
        .unwrap()
    }

    #[test]
    fn active_sub_form_saved() {
        let data = form(
            "multiple_choice",
            json!({ "question": "Hello?", "options": ["Hola", " Adiós "], "correct_index": 0 }),
        )
        .validate()
        .unwrap();
        assert_eq!(data.points, 10);
        assert_eq!(
            data.content.to_value().unwrap(),
            json!({ "question": "Hello?", "options": ["Hola", "Adiós"], "correct_index": 0 })
        );
    }

    #[test]
    fn unknown_type_rejected() {
        let errors = form("essay", json!({})).validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "exercise_type");
    }

    #[test]
    fn sub_form_errors_reported_with_title() {
        let mut f = form("matching", json!({ "pairs": [] }));
        f.title = String::new();
        let errors = f.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["title", "content.pairs"]);
    }

    #[test]
    fn content_of_wrong_shape_rejected() {
        let errors = form("listening", json!({ "options": "not a list" }))
            .validate()
            .unwrap_err();
        assert_eq!(errors[0].field, "content");
    }
}
