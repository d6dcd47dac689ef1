use serde::Deserialize;

use crate::{
    forms::{
        FieldError, FormErrors,
        validate::optional,
    },
    model::entity::LanguageCreate,
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LanguageForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub native_name: Option<String>,
    pub flag_emoji: Option<String>,
    pub is_active: Option<bool>,
}

impl LanguageForm {
    pub fn validate(self) -> Result<LanguageCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let code = errors.required("code", &self.code).to_lowercase();
        let name = errors.required("name", &self.name);
        errors.finish()?;

        Ok(LanguageCreate {
            code,
            name,
            native_name: optional(self.native_name),
            flag_emoji: optional(self.flag_emoji),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code_is_lower_cased() {
        let form: LanguageForm =
            serde_json::from_str(r#"{"code": " ES ", "name": "Spanish", "native_name": " "}"#)
                .unwrap();
        let data = form.validate().unwrap();
        assert_eq!(data.code, "es");
        assert_eq!(data.native_name, None);
        assert!(data.is_active);
    }

    #[test]
    fn both_required_fields_reported() {
        let form: LanguageForm = serde_json::from_str("{}").unwrap();
        let errors = form.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["code", "name"]);
    }
}
