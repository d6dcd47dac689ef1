use crate::impl_paginatable_for;
use crate::model::dependents::{Dependent, HasDependents, count_where};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Word {
    id: Uuid,
    language_id: Uuid,
    word: String,
    translation: String,
    pronunciation: Option<String>,
    part_of_speech: Option<String>,
    audio_url: Option<String>,
    difficulty_level: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Word {
    fn get_resource_type() -> ResourceType {
        ResourceType::Word
    }
}

impl Word {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn language_id(&self) -> Uuid {
        self.language_id
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    pub fn difficulty_level(&self) -> i32 {
        self.difficulty_level
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordCreate {
    pub language_id: Uuid,
    pub word: String,
    pub translation: String,
    pub pronunciation: Option<String>,
    pub part_of_speech: Option<String>,
    pub audio_url: Option<String>,
    pub difficulty_level: i32,
}

#[async_trait]
impl CrudRepository<Word, WordCreate, Uuid> for Word {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: WordCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO words
                (id, language_id, word, translation, pronunciation, part_of_speech, audio_url, difficulty_level)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.language_id)
        .bind(&data.word)
        .bind(&data.translation)
        .bind(&data.pronunciation)
        .bind(&data.part_of_speech)
        .bind(&data.audio_url)
        .bind(data.difficulty_level)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: WordCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE words
            SET language_id = $1, word = $2, translation = $3, pronunciation = $4,
                part_of_speech = $5, audio_url = $6, difficulty_level = $7
            WHERE id = $8
            "#,
        )
        .bind(data.language_id)
        .bind(&data.word)
        .bind(&data.translation)
        .bind(&data.pronunciation)
        .bind(&data.part_of_speech)
        .bind(&data.audio_url)
        .bind(data.difficulty_level)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.language_id = data.language_id;
        self.word = data.word;
        self.translation = data.translation;
        self.pronunciation = data.pronunciation;
        self.part_of_speech = data.part_of_speech;
        self.audio_url = data.audio_url;
        self.difficulty_level = data.difficulty_level;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM words WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM words WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        scope: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT * FROM words
            WHERE ($1::uuid IS NULL OR language_id = $1)
            ORDER BY word
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(scope)
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        scope: Option<Uuid>,
    ) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM words WHERE ($1::uuid IS NULL OR language_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Word, WordCreate, Uuid);

#[async_trait]
impl HasDependents for Word {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let sentences = count_where(mm, "sentences", "word_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::Sentence, sentences)])
    }
}
