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

pub const MODULE_DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LearningModule {
    id: Uuid,
    category_id: Uuid,
    title: String,
    description: Option<String>,
    difficulty: String,
    estimated_minutes: i32,
    points: i32,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for LearningModule {
    fn get_resource_type() -> ResourceType {
        ResourceType::Module
    }
}

impl LearningModule {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn category_id(&self) -> Uuid {
        self.category_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn estimated_minutes(&self) -> i32 {
        self.estimated_minutes
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LearningModuleCreate {
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub estimated_minutes: i32,
    pub points: i32,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<LearningModule, LearningModuleCreate, Uuid> for LearningModule {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LearningModuleCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO learning_modules
                (id, category_id, title, description, difficulty, estimated_minutes, points, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.difficulty)
        .bind(data.estimated_minutes)
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
        data: LearningModuleCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE learning_modules
            SET category_id = $1, title = $2, description = $3, difficulty = $4,
                estimated_minutes = $5, points = $6, order_index = $7
            WHERE id = $8
            "#,
        )
        .bind(data.category_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.difficulty)
        .bind(data.estimated_minutes)
        .bind(data.points)
        .bind(data.order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.category_id = data.category_id;
        self.title = data.title;
        self.description = data.description;
        self.difficulty = data.difficulty;
        self.estimated_minutes = data.estimated_minutes;
        self.points = data.points;
        self.order_index = data.order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM learning_modules WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM learning_modules WHERE id = $1")
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
            SELECT * FROM learning_modules
            WHERE ($1::uuid IS NULL OR category_id = $1)
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
            "SELECT COUNT(*) FROM learning_modules WHERE ($1::uuid IS NULL OR category_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(LearningModule, LearningModuleCreate, Uuid);

#[async_trait]
impl HasDependents for LearningModule {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let exercises = count_where(mm, "exercises", "module_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::Exercise, exercises)])
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModuleCardRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub estimated_minutes: i32,
    pub points: i32,
    pub exercise_count: i64,
    pub exercise_points: i64,
}

impl ModuleCardRow {
    pub async fn fetch_all(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        category_id: Option<Uuid>,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                m.id,
                m.category_id,
                m.title,
                m.description,
                m.difficulty,
                m.estimated_minutes,
                m.points,
                COUNT(e.id) AS exercise_count,
                COALESCE(SUM(e.points), 0)::BIGINT AS exercise_points
            FROM learning_modules m
            LEFT JOIN exercises e ON e.module_id = m.id
            WHERE ($1::uuid IS NULL OR m.category_id = $1)
            GROUP BY m.id
            ORDER BY m.order_index, m.title
            "#,
        )
        .bind(category_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
