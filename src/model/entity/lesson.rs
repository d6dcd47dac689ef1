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
pub struct Lesson {
    id: Uuid,
    course_id: Uuid,
    title: String,
    content: String,
    duration_minutes: i32,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> ResourceType {
        ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LessonCreate {
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub duration_minutes: i32,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, Uuid> for Lesson {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lessons (id, course_id, title, content, duration_minutes, order_index)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.duration_minutes)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE lessons SET course_id = $1, title = $2, content = $3, duration_minutes = $4, order_index = $5 WHERE id = $6")
            .bind(data.course_id)
            .bind(&data.title)
            .bind(&data.content)
            .bind(data.duration_minutes)
            .bind(data.order_index)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.course_id = data.course_id;
        self.title = data.title;
        self.content = data.content;
        self.duration_minutes = data.duration_minutes;
        self.order_index = data.order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
            SELECT * FROM lessons
            WHERE ($1::uuid IS NULL OR course_id = $1)
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
            "SELECT COUNT(*) FROM lessons WHERE ($1::uuid IS NULL OR course_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Lesson, LessonCreate, Uuid);
