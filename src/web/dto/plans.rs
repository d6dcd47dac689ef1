use serde::Deserialize;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, non_negative, optional},
    },
    model::entity::MembershipPlanCreate,
};

pub const DEFAULT_PLAN_DAYS: i32 = 30;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MembershipPlanForm {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub price_cents: Option<FormNumber>,
    #[schema(value_type = Option<i64>)]
    pub duration_days: Option<FormNumber>,
    #[serde(default)]
    pub features: Vec<String>,
    pub is_active: Option<bool>,
}

impl MembershipPlanForm {
    pub fn validate(self) -> Result<MembershipPlanCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let name = errors.required("name", &self.name);
        errors.finish()?;

        Ok(MembershipPlanCreate {
            name,
            description: optional(self.description),
            price_cents: non_negative(self.price_cents.as_ref()),
            duration_days: count(self.duration_days.as_ref(), DEFAULT_PLAN_DAYS),
            features: self
                .features
                .into_iter()
                .filter_map(|f| optional(Some(f)))
                .collect(),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_features_dropped() {
        let form: MembershipPlanForm = serde_json::from_value(json!({
            "name": "Plus",
            "price_cents": "-100",
            "features": [" Offline mode ", "", "No ads"],
        }))
        .unwrap();
        let data = form.validate().unwrap();
        assert_eq!(data.features, ["Offline mode", "No ads"]);
        assert_eq!(data.price_cents, 0);
        assert_eq!(data.duration_days, DEFAULT_PLAN_DAYS);
        assert!(data.is_active);
    }
}
