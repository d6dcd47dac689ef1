use serde::Deserialize;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{optional, order_index},
    },
    model::entity::CategoryCreate,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub order_index: Option<FormNumber>,
}

impl CategoryForm {
    pub fn validate(self) -> Result<CategoryCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let name = errors.required("name", &self.name);
        errors.finish()?;

        Ok(CategoryCreate {
            name,
            description: optional(self.description),
            icon: optional(self.icon),
            color: optional(self.color),
            order_index: order_index(self.order_index.as_ref()),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_required() {
        let form: CategoryForm = serde_json::from_value(json!({ "name": "  " })).unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn blank_styling_stored_as_null() {
        let form: CategoryForm = serde_json::from_value(json!({
            "name": " Travel ",
            "icon": "",
            "color": " #ff8800 ",
            "order_index": "-2",
        }))
        .unwrap();
        let data = form.validate().unwrap();
        assert_eq!(data.name, "Travel");
        assert_eq!(data.icon, None);
        assert_eq!(data.color.as_deref(), Some("#ff8800"));
        assert_eq!(data.order_index, 0);
    }
}
