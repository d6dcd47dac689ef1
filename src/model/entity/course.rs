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

pub const COURSE_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    language_id: Uuid,
    title: String,
    description: Option<String>,
    level: String,
    is_published: bool,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> ResourceType {
        ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn language_id(&self) -> Uuid {
        self.language_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CourseCreate {
    pub language_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub is_published: bool,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO courses (id, language_id, title, description, level, is_published, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.language_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.level)
        .bind(data.is_published)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE courses
            SET language_id = $1, title = $2, description = $3, level = $4, is_published = $5, order_index = $6
            WHERE id = $7
            "#,
        )
        .bind(data.language_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.level)
        .bind(data.is_published)
        .bind(data.order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.language_id = data.language_id;
        self.title = data.title;
        self.description = data.description;
        self.level = data.level;
        self.is_published = data.is_published;
        self.order_index = data.order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
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
            SELECT * FROM courses
            WHERE ($1::uuid IS NULL OR language_id = $1)
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
            "SELECT COUNT(*) FROM courses WHERE ($1::uuid IS NULL OR language_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Course, CourseCreate, Uuid);

#[async_trait]
impl HasDependents for Course {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let lessons = count_where(mm, "lessons", "course_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::Lesson, lessons)])
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseRecommendationRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub level: String,
    pub language_id: Uuid,
    pub language_name: String,
    pub lesson_count: i64,
}

impl CourseRecommendationRow {
    /// Published courses of active languages, first in catalogue order.
    pub async fn fetch(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        language_id: Option<Uuid>,
        limit: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.title,
                c.description,
                c.level,
                c.language_id,
                l.name AS language_name,
                COUNT(le.id) AS lesson_count
            FROM courses c
            JOIN languages l ON l.id = c.language_id
            LEFT JOIN lessons le ON le.course_id = c.id
            WHERE c.is_published = TRUE
              AND l.is_active = TRUE
              AND ($1::uuid IS NULL OR c.language_id = $1)
            GROUP BY c.id, l.name
            ORDER BY c.order_index, c.title
            LIMIT $2
            "#,
        )
        .bind(language_id)
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
