//! Exercise content editor.
//!
//! An exercise row stores its kind as a plain string next to a JSON `content`
//! column. The editor shows exactly one of three sub-forms depending on that
//! kind and only the active sub-form is written back on save.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::validate::{FieldError, FormErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    MultipleChoice,
    Matching,
    Listening,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [Self::MultipleChoice, Self::Matching, Self::Listening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Matching => "matching",
            Self::Listening => "listening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple choice",
            Self::Matching => "Matching",
            Self::Listening => "Listening",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown exercise type `{0}`")]
pub struct UnknownExerciseType(pub String);

impl FromStr for ExerciseType {
    type Err = UnknownExerciseType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" => Ok(Self::MultipleChoice),
            "matching" => Ok(Self::Matching),
            "listening" => Ok(Self::Listening),
            _ => Err(UnknownExerciseType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct MultipleChoiceContent {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct MatchingContent {
    pub pairs: Vec<MatchingPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct ListeningContent {
    pub audio_url: String,
    pub transcript: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseContent {
    MultipleChoice(MultipleChoiceContent),
    Matching(MatchingContent),
    Listening(ListeningContent),
}

impl ExerciseContent {
    pub fn kind(&self) -> ExerciseType {
        match self {
            Self::MultipleChoice(_) => ExerciseType::MultipleChoice,
            Self::Matching(_) => ExerciseType::Matching,
            Self::Listening(_) => ExerciseType::Listening,
        }
    }

    pub fn empty(kind: ExerciseType) -> Self {
        match kind {
            ExerciseType::MultipleChoice => Self::MultipleChoice(Default::default()),
            ExerciseType::Matching => Self::Matching(Default::default()),
            ExerciseType::Listening => Self::Listening(Default::default()),
        }
    }

    /// Strict decoding of a submitted sub-form.
    pub fn decode(kind: ExerciseType, value: Value) -> serde_json::Result<Self> {
        let value = if value.is_null() {
            Value::Object(Default::default())
        } else {
            value
        };

        Ok(match kind {
            ExerciseType::MultipleChoice => Self::MultipleChoice(serde_json::from_value(value)?),
            ExerciseType::Matching => Self::Matching(serde_json::from_value(value)?),
            ExerciseType::Listening => Self::Listening(serde_json::from_value(value)?),
        })
    }

    /// Lenient decoding of a stored row: anything that doesn't fit the kind
    /// yields the empty sub-form.
    pub fn from_stored(kind: ExerciseType, value: &Value) -> Self {
        Self::decode(kind, value.clone()).unwrap_or_else(|e| {
            tracing::warn!("stored {kind} content does not decode: {e}");
            Self::empty(kind)
        })
    }

    /// JSON written into the `content` column. The kind lives in its own
    /// column and is not repeated here.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::MultipleChoice(c) => serde_json::to_value(c),
            Self::Matching(c) => serde_json::to_value(c),
            Self::Listening(c) => serde_json::to_value(c),
        }
    }

    /// Trims text fields and drops blank matching rows in place, then checks
    /// the sub-form.
    pub fn normalize_and_validate(&mut self, errors: &mut FormErrors) {
        match self {
            Self::MultipleChoice(c) => {
                c.question = errors.required("content.question", &c.question);
                c.options = trim_all(&c.options);
                if c.options.len() < 2 {
                    errors.add("content.options", "at least two options are required");
                } else if c.options.iter().any(String::is_empty) {
                    errors.add("content.options", "options cannot be empty");
                }
                if c.correct_index >= c.options.len() {
                    errors.add("content.correct_index", "correct answer must be one of the options");
                }
            }
            Self::Matching(c) => {
                c.pairs = c
                    .pairs
                    .iter()
                    .map(|p| MatchingPair {
                        left: p.left.trim().to_string(),
                        right: p.right.trim().to_string(),
                    })
                    .filter(|p| !(p.left.is_empty() && p.right.is_empty()))
                    .collect();
                if c.pairs.is_empty() {
                    errors.add("content.pairs", "at least one pair is required");
                }
                for (i, p) in c.pairs.iter().enumerate() {
                    if p.left.is_empty() || p.right.is_empty() {
                        errors.push(FieldError::new(
                            format!("content.pairs[{i}]"),
                            "both sides of a pair are required",
                        ));
                    }
                }
            }
            Self::Listening(c) => {
                c.audio_url = errors.required("content.audio_url", &c.audio_url);
                c.transcript = c.transcript.trim().to_string();
                c.question = c.question.trim().to_string();
                c.options = trim_all(&c.options);
                match c.correct_index {
                    Some(i) if i >= c.options.len() => {
                        errors.add("content.correct_index", "correct answer must be one of the options")
                    }
                    None if !c.options.is_empty() => {
                        errors.add("content.correct_index", "choose the correct option")
                    }
                    _ => {}
                }
            }
        }
    }

    /// One-line description used by the exercise preview card.
    pub fn summary(&self) -> String {
        match self {
            Self::MultipleChoice(c) => plural(c.options.len(), "option"),
            Self::Matching(c) => plural(c.pairs.len(), "pair"),
            Self::Listening(c) if c.options.is_empty() => String::from("Listening clip"),
            Self::Listening(c) => format!("Listening clip, {}", plural(c.options.len(), "option")),
        }
    }

    pub fn prompt(&self) -> Option<&str> {
        let q = match self {
            Self::MultipleChoice(c) => c.question.as_str(),
            Self::Matching(_) => return None,
            Self::Listening(c) => c.question.as_str(),
        };
        (!q.is_empty()).then_some(q)
    }
}

fn trim_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_string()).collect()
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// What the edit screen needs: the active kind and every sub-form, the
/// inactive ones at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseEditor {
    pub exercise_type: ExerciseType,
    pub multiple_choice: MultipleChoiceContent,
    pub matching: MatchingContent,
    pub listening: ListeningContent,
}

impl ExerciseEditor {
    pub fn from_stored(stored_type: &str, content: &Value) -> Self {
        let kind = stored_type.parse().unwrap_or_else(|e: UnknownExerciseType| {
            tracing::warn!("{e}, falling back to multiple choice");
            ExerciseType::MultipleChoice
        });

        let mut editor = Self {
            exercise_type: kind,
            multiple_choice: Default::default(),
            matching: Default::default(),
            listening: Default::default(),
        };

        match ExerciseContent::from_stored(kind, content) {
            ExerciseContent::MultipleChoice(c) => editor.multiple_choice = c,
            ExerciseContent::Matching(c) => editor.matching = c,
            ExerciseContent::Listening(c) => editor.listening = c,
        }
        editor
    }

    pub fn active(&self) -> ExerciseContent {
        match self.exercise_type {
            ExerciseType::MultipleChoice => ExerciseContent::MultipleChoice(self.multiple_choice.clone()),
            ExerciseType::Matching => ExerciseContent::Matching(self.matching.clone()),
            ExerciseType::Listening => ExerciseContent::Listening(self.listening.clone()),
        }
    }
}
