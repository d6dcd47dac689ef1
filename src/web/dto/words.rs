use serde::Deserialize;
use uuid::Uuid;

use crate::{
    forms::{
        FieldError, FormErrors, FormNumber,
        validate::{count, optional, required_id},
    },
    model::entity::{SentenceCreate, WordCreate},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct WordForm {
    pub language_id: Option<Uuid>,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub translation: String,
    pub pronunciation: Option<String>,
    pub part_of_speech: Option<String>,
    pub audio_url: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub difficulty_level: Option<FormNumber>,
}

impl WordForm {
    pub fn validate(self) -> Result<WordCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let language_id = required_id(&mut errors, "language_id", self.language_id);
        let word = errors.required("word", &self.word);
        let translation = errors.required("translation", &self.translation);
        errors.finish()?;

        Ok(WordCreate {
            language_id,
            word,
            translation,
            pronunciation: optional(self.pronunciation),
            part_of_speech: optional(self.part_of_speech),
            audio_url: optional(self.audio_url),
            difficulty_level: count(self.difficulty_level.as_ref(), 1),
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SentenceForm {
    pub word_id: Option<Uuid>,
    #[serde(default)]
    pub sentence: String,
    pub translation: Option<String>,
    pub audio_url: Option<String>,
}

impl SentenceForm {
    pub fn validate(self) -> Result<SentenceCreate, Vec<FieldError>> {
        let mut errors = FormErrors::new();
        let word_id = required_id(&mut errors, "word_id", self.word_id);
        let sentence = errors.required("sentence", &self.sentence);
        errors.finish()?;

        Ok(SentenceCreate {
            word_id,
            sentence,
            translation: optional(self.translation),
            audio_url: optional(self.audio_url),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn word_and_translation_required() {
        let form: WordForm = serde_json::from_value(json!({
            "language_id": Uuid::new_v4(),
            "word": "gato",
            "translation": "  ",
        }))
        .unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "translation");
    }

    #[test]
    fn difficulty_defaults_to_one() {
        let form: WordForm = serde_json::from_value(json!({
            "language_id": Uuid::new_v4(),
            "word": "gato",
            "translation": "cat",
            "difficulty_level": null,
        }))
        .unwrap();
        assert_eq!(form.validate().unwrap().difficulty_level, 1);
    }
}
