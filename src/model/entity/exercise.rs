use crate::forms::exercise::{ExerciseContent, ExerciseEditor};
use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Exercise {
    id: Uuid,
    module_id: Uuid,
    title: String,
    exercise_type: String,
    #[schema(value_type = Object)]
    content: serde_json::Value,
    points: i32,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Exercise {
    fn get_resource_type() -> ResourceType {
        ResourceType::Exercise
    }
}

impl Exercise {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn module_id(&self) -> Uuid {
        self.module_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn exercise_type(&self) -> &str {
        &self.exercise_type
    }

    pub fn content(&self) -> &serde_json::Value {
        &self.content
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    /// The stored row as the editor sees it.
    pub fn editor(&self) -> ExerciseEditor {
        ExerciseEditor::from_stored(&self.exercise_type, &self.content)
    }
}

/// Only the active sub-form reaches the database.
#[derive(Debug, Clone)]
pub struct ExerciseCreate {
    pub module_id: Uuid,
    pub title: String,
    pub content: ExerciseContent,
    pub points: i32,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<Exercise, ExerciseCreate, Uuid> for Exercise {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let content = data.content.to_value()?;
        let row = sqlx::query_as(
            r#"
            INSERT INTO exercises (id, module_id, title, exercise_type, content, points, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.module_id)
        .bind(&data.title)
        .bind(data.content.kind().as_str())
        .bind(&content)
        .bind(data.points)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let content = data.content.to_value()?;
        let kind = data.content.kind().as_str().to_string();
        sqlx::query(
            r#"
            UPDATE exercises
            SET module_id = $1, title = $2, exercise_type = $3, content = $4, points = $5, order_index = $6
            WHERE id = $7
            "#,
        )
        .bind(data.module_id)
        .bind(&data.title)
        .bind(&kind)
        .bind(&content)
        .bind(data.points)
        .bind(data.order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.module_id = data.module_id;
        self.title = data.title;
        self.exercise_type = kind;
        self.content = content;
        self.points = data.points;
        self.order_index = data.order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM exercises WHERE id = $1")
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
            SELECT * FROM exercises
            WHERE ($1::uuid IS NULL OR module_id = $1)
            ORDER BY order_index, title
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
            "SELECT COUNT(*) FROM exercises WHERE ($1::uuid IS NULL OR module_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Exercise, ExerciseCreate, Uuid);
