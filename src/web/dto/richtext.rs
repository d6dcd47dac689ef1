use serde::Deserialize;

use crate::forms::richtext::{Markup, Selection};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FormatRequest {
    #[serde(default)]
    pub text: String,
    /// Absent when no editor element has focus
    pub selection: Option<Selection>,
    pub markup: Markup,
}
