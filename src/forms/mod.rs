//! Form-level logic shared by the dashboard endpoints: field validation,
//! the exercise content editor and the rich-text helper.

pub mod exercise;
pub mod richtext;
pub mod validate;

pub use validate::{FieldError, FormErrors, FormNumber};
