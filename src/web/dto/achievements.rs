use serde::Deserialize;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, optional, points},
    },
    model::entity::AchievementCreate,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AchievementForm {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub points: Option<FormNumber>,
    /// e.g. `lessons_completed`, `streak_days`
    #[serde(default)]
    pub requirement_type: String,
    #[schema(value_type = Option<i64>)]
    pub requirement_count: Option<FormNumber>,
}

impl AchievementForm {
    pub fn validate(self) -> Result<AchievementCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let title = errors.required("title", &self.title);
        let requirement_type = errors
            .required("requirement_type", &self.requirement_type)
            .to_lowercase();
        errors.finish()?;

        Ok(AchievementCreate {
            title,
            description: optional(self.description),
            icon: optional(self.icon),
            points: points(self.points.as_ref()),
            requirement_type,
            requirement_count: count(self.requirement_count.as_ref(), 1),
        })
    }
}
