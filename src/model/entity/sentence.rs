use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Example sentence illustrating a vocabulary word.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Sentence {
    id: Uuid,
    word_id: Uuid,
    sentence: String,
    translation: Option<String>,
    audio_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Sentence {
    fn get_resource_type() -> ResourceType {
        ResourceType::Sentence
    }
}

impl Sentence {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn word_id(&self) -> Uuid {
        self.word_id
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentenceCreate {
    pub word_id: Uuid,
    pub sentence: String,
    pub translation: Option<String>,
    pub audio_url: Option<String>,
}

#[async_trait]
impl CrudRepository<Sentence, SentenceCreate, Uuid> for Sentence {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: SentenceCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            "INSERT INTO sentences (id, word_id, sentence, translation, audio_url) VALUES ($1,$2,$3,$4,$5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.word_id)
        .bind(&data.sentence)
        .bind(&data.translation)
        .bind(&data.audio_url)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: SentenceCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE sentences SET word_id = $1, sentence = $2, translation = $3, audio_url = $4 WHERE id = $5")
            .bind(data.word_id)
            .bind(&data.sentence)
            .bind(&data.translation)
            .bind(&data.audio_url)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.word_id = data.word_id;
        self.sentence = data.sentence;
        self.translation = data.translation;
        self.audio_url = data.audio_url;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM sentences WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM sentences WHERE id = $1")
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
            SELECT * FROM sentences
            WHERE ($1::uuid IS NULL OR word_id = $1)
            ORDER BY created_at
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
            "SELECT COUNT(*) FROM sentences WHERE ($1::uuid IS NULL OR word_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Sentence, SentenceCreate, Uuid);
