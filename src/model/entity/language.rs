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
pub struct Language {
    id: Uuid,
    code: String,
    name: String,
    native_name: Option<String>,
    flag_emoji: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Language {
    fn get_resource_type() -> ResourceType {
        ResourceType::Language
    }
}

impl Language {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn native_name(&self) -> Option<&str> {
        self.native_name.as_deref()
    }

    pub fn flag_emoji(&self) -> Option<&str> {
        self.flag_emoji.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageCreate {
    pub code: String,
    pub name: String,
    pub native_name: Option<String>,
    pub flag_emoji: Option<String>,
    pub is_active: bool,
}

#[async_trait]
impl CrudRepository<Language, LanguageCreate, Uuid> for Language {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LanguageCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO languages (id, code, name, native_name, flag_emoji, is_active)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.native_name)
        .bind(&data.flag_emoji)
        .bind(data.is_active)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LanguageCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE languages SET code = $1, name = $2, native_name = $3, flag_emoji = $4, is_active = $5 WHERE id = $6")
            .bind(&data.code)
            .bind(&data.name)
            .bind(&data.native_name)
            .bind(&data.flag_emoji)
            .bind(data.is_active)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.code = data.code;
        self.name = data.name;
        self.native_name = data.native_name;
        self.flag_emoji = data.flag_emoji;
        self.is_active = data.is_active;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM languages WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        _scope: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM languages ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        _scope: Option<Uuid>,
    ) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Language, LanguageCreate, Uuid);

#[async_trait]
impl HasDependents for Language {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let (courses, words, preferences) = tokio::try_join!(
            count_where(mm, "courses", "language_id", self.id),
            count_where(mm, "words", "language_id", self.id),
            count_where(mm, "user_preferences", "target_language_id", self.id),
        )?;

        Ok(vec![
            Dependent::new(ResourceType::Course, courses),
            Dependent::new(ResourceType::Word, words),
            Dependent::new(ResourceType::UserPreference, preferences),
        ])
    }
}

impl Language {
    pub async fn find_by_code(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        code: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM languages WHERE code = $1")
            .bind(code.to_lowercase())
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}
