//! Wraps the current selection of a text buffer in paired markup and
//! restores the selection afterwards. Positions are counted in characters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RichTextError {
    #[error("no element focused")]
    NoSelection,
    #[error("markup cannot be empty")]
    EmptyMarkup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case", tag = "style")]
pub enum Markup {
    Bold,
    Italic,
    Underline,
    Highlight,
    Custom { open: String, close: String },
}

impl Markup {
    pub fn tags(&self) -> (&str, &str) {
        match self {
            Self::Bold => ("<b>", "</b>"),
            Self::Italic => ("<i>", "</i>"),
            Self::Underline => ("<u>", "</u>"),
            Self::Highlight => ("<mark>", "</mark>"),
            Self::Custom { open, close } => (open.as_str(), close.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Splices `markup` around `selection`.
///
/// Out-of-range positions are clamped to the end of the buffer and a
/// reversed range is normalized. The returned selection covers the same
/// text as before; a collapsed selection ends up between the two tags.
pub fn apply(text: &str, selection: Option<Selection>, markup: &Markup) -> Result<Edit, RichTextError> {
    let selection = selection.ok_or(RichTextError::NoSelection)?;
    let (open, close) = markup.tags();
    if open.is_empty() && close.is_empty() {
        return Err(RichTextError::EmptyMarkup);
    }

    let len = text.chars().count();
    let start = selection.start.min(selection.end).min(len);
    let end = selection.start.max(selection.end).min(len);

    let (head, rest) = text.split_at(byte_offset(text, start));
    let (middle, tail) = rest.split_at(byte_offset(rest, end - start));

    let mut out = String::with_capacity(text.len() + open.len() + close.len());
    out.push_str(head);
    out.push_str(open);
    out.push_str(middle);
    out.push_str(close);
    out.push_str(tail);

    let open_len = open.chars().count();
    Ok(Edit {
        text: out,
        selection: Selection {
            start: start + open_len,
            end: end + open_len,
        },
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wraps_selected_word() {
        let edit = apply("say hello now", Some(Selection { start: 4, end: 9 }), &Markup::Bold).unwrap();
        assert_eq!(edit.text, "say <b>hello</b> now");
        assert_eq!(edit.selection, Selection { start: 7, end: 12 });
        assert_eq!(&edit.text[7..12], "hello");
    }

    #[test]
    fn collapsed_selection_puts_cursor_between_tags() {
        let edit = apply("ab", Some(Selection::caret(1)), &Markup::Italic).unwrap();
        assert_eq!(edit.text, "a<i></i>b");
        assert!(edit.selection.is_collapsed());
        assert_eq!(edit.selection.start, 4);
    }

    #[test]
    fn no_selection_means_nothing_focused() {
        assert_eq!(apply("abc", None, &Markup::Bold), Err(RichTextError::NoSelection));
    }

    #[test]
    fn reversed_and_overflowing_ranges() {
        let edit = apply("abc", Some(Selection { start: 10, end: 1 }), &Markup::Underline).unwrap();
        assert_eq!(edit.text, "a<u>bc</u>");
        assert_eq!(edit.selection, Selection { start: 4, end: 6 });
    }

    #[test]
    fn counts_characters_not_bytes() {
        let edit = apply("¿Qué tal?", Some(Selection { start: 1, end: 4 }), &Markup::Highlight).unwrap();
        assert_eq!(edit.text, "¿<mark>Qué</mark> tal?");
        assert_eq!(edit.selection, Selection { start: 7, end: 10 });
    }

    #[test]
    fn custom_markup() {
        let markup = Markup::Custom { open: "**".into(), close: "**".into() };
        let edit = apply("hola", Some(Selection { start: 0, end: 4 }), &markup).unwrap();
        assert_eq!(edit.text, "**hola**");

        let empty = Markup::Custom { open: String::new(), close: String::new() };
        assert_eq!(apply("hola", Some(Selection::caret(0)), &empty), Err(RichTextError::EmptyMarkup));
    }

    #[test]
    fn markup_deserializes_from_style_tag() {
        let m: Markup = serde_json::from_str(r#"{ "style": "bold" }"#).unwrap();
        assert_eq!(m, Markup::Bold);
        let m: Markup = serde_json::from_str(r#"{ "style": "custom", "open": "[", "close": "]" }"#).unwrap();
        assert_eq!(m.tags(), ("[", "]"));
    }
}
