use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_POINTS: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collects every field problem of a submitted form before rejecting it.
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.push(FieldError::new(field, message));
    }

    /// Runs `required` and records the failure, returning whatever was there.
    pub fn required(&mut self, field: &str, value: &str) -> String {
        match required(field, value) {
            Ok(v) => v,
            Err(e) => {
                self.push(e);
                String::new()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Numeric input as it arrives from a form: either a JSON number or the raw
/// text of an input box.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FormNumber {
    pub fn parse(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => truncate(*v),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(truncate))
            }
        }
    }
}

fn truncate(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.trunc() as i64)
}

impl From<i64> for FormNumber {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

pub fn required(field: &str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FieldError::new(field, format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

/// A parent reference the form cannot be saved without.
pub fn required_id(errors: &mut FormErrors, field: &str, value: Option<Uuid>) -> Uuid {
    match value {
        Some(id) if !id.is_nil() => id,
        _ => {
            errors.add(field, format!("{field} is required"));
            Uuid::nil()
        }
    }
}

/// Trims optional text; blank input is stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Points are at least 1; anything unparsable falls back to 10.
pub fn points(raw: Option<&FormNumber>) -> i32 {
    count(raw, DEFAULT_POINTS)
}

/// Counts are at least 1; anything unparsable falls back to `default`.
pub fn count(raw: Option<&FormNumber>, default: i32) -> i32 {
    match raw.and_then(FormNumber::parse) {
        Some(v) => saturate(v).max(1),
        None => default.max(1),
    }
}

/// Non-negative number, 0 when missing or unparsable.
pub fn non_negative(raw: Option<&FormNumber>) -> i32 {
    raw.and_then(FormNumber::parse).map(saturate).unwrap_or(0).max(0)
}

pub fn order_index(raw: Option<&FormNumber>) -> i32 {
    non_negative(raw)
}

/// Checks `value` against a closed set, falling back to the first entry when
/// nothing was sent.
pub fn one_of(
    errors: &mut FormErrors,
    field: &str,
    value: Option<&str>,
    allowed: &[&str],
) -> String {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    match value {
        None => allowed[0].to_string(),
        Some(v) => {
            let lowered = v.to_lowercase();
            if allowed.contains(&lowered.as_str()) {
                lowered
            } else {
                errors.add(field, format!("{field} must be one of: {}", allowed.join(", ")));
                lowered
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn text(s: &str) -> FormNumber {
        FormNumber::Text(s.to_string())
    }

    #[test]
    fn required_rejects_blank_title() {
        assert!(required("title", "").is_err());
        assert!(required("title", "   \t").is_err());
        assert_eq!(required("title", "  Greetings ").unwrap(), "Greetings");

        let err = required("title", "").unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "title is required");
    }

    #[test]
    fn points_default_when_parse_fails() {
        assert_eq!(points(None), 10);
        assert_eq!(points(Some(&text("abc"))), 10);
        assert_eq!(points(Some(&text(""))), 10);
        assert_eq!(points(Some(&text(" 25 "))), 25);
        assert_eq!(points(Some(&FormNumber::Int(40))), 40);
    }

    #[test]
    fn points_clamp_to_one() {
        assert_eq!(points(Some(&FormNumber::Int(0))), 1);
        assert_eq!(points(Some(&text("-5"))), 1);
        assert_eq!(points(Some(&FormNumber::Float(2.9))), 2);
        assert_eq!(points(Some(&text("2.9"))), 2);
    }

    #[test]
    fn counts_use_their_own_default() {
        assert_eq!(count(None, 30), 30);
        assert_eq!(count(Some(&text("x")), 5), 5);
        assert_eq!(count(Some(&FormNumber::Int(i64::MAX)), 5), i32::MAX);
    }

    #[test]
    fn missing_parent_is_a_field_error() {
        let mut errors = FormErrors::new();
        let id = Uuid::new_v4();
        assert_eq!(required_id(&mut errors, "course_id", Some(id)), id);
        assert!(errors.is_empty());

        required_id(&mut errors, "course_id", None);
        required_id(&mut errors, "module_id", Some(Uuid::nil()));
        let errors = errors.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].message, "module_id is required");
    }

    #[test]
    fn order_index_never_negative() {
        assert_eq!(order_index(None), 0);
        assert_eq!(order_index(Some(&text("-3"))), 0);
        assert_eq!(order_index(Some(&text("7"))), 7);
    }

    #[test]
    fn form_number_deserializes_numbers_and_text() {
        let v: Vec<FormNumber> =
            serde_json::from_str(r#"[3, "4", 1.5, "nope", 2.9, " 2.9 ", "NaN", "-0.5"]"#).unwrap();
        assert_eq!(v[0].parse(), Some(3));
        assert_eq!(v[1].parse(), Some(4));
        assert_eq!(v[2].parse(), Some(1));
        assert_eq!(v[3].parse(), None);
        assert_eq!(v[4].parse(), v[5].parse());
        assert_eq!(v[5].parse(), Some(2));
        assert_eq!(v[6].parse(), None);
        assert_eq!(v[7].parse(), Some(0));
    }

    #[test]
    fn optional_blank_becomes_none() {
        assert_eq!(optional(Some("  ".into())), None);
        assert_eq!(optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(optional(None), None);
    }

    #[test]
    fn one_of_defaults_and_rejects() {
        let mut errors = FormErrors::new();
        let levels = ["beginner", "intermediate", "advanced"];
        assert_eq!(one_of(&mut errors, "level", None, &levels), "beginner");
        assert_eq!(one_of(&mut errors, "level", Some("Advanced"), &levels), "advanced");
        assert!(errors.is_empty());

        one_of(&mut errors, "level", Some("expert"), &levels);
        let errs = errors.finish().unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "level");
    }

    #[test]
    fn form_errors_collect_everything() {
        let mut errors = FormErrors::new();
        assert_eq!(errors.required("title", ""), "");
        assert_eq!(errors.required("name", "ok"), "ok");
        errors.add("points", "too many");
        assert_eq!(errors.finish().unwrap_err().len(), 2);
    }
}
