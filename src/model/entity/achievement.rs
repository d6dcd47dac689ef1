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
pub struct Achievement {
    id: Uuid,
    title: String,
    description: Option<String>,
    icon: Option<String>,
    points: i32,
    requirement_type: String,
    requirement_count: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Achievement {
    fn get_resource_type() -> ResourceType {
        ResourceType::Achievement
    }
}

impl Achievement {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn requirement_type(&self) -> &str {
        &self.requirement_type
    }

    pub fn requirement_count(&self) -> i32 {
        self.requirement_count
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AchievementCreate {
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub points: i32,
    pub requirement_type: String,
    pub requirement_count: i32,
}

#[async_trait]
impl CrudRepository<Achievement, AchievementCreate, Uuid> for Achievement {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AchievementCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO achievements
                (id, title, description, icon, points, requirement_type, requirement_count)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(data.points)
        .bind(&data.requirement_type)
        .bind(data.requirement_count)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AchievementCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE achievements
            SET title = $1, description = $2, icon = $3, points = $4,
                requirement_type = $5, requirement_count = $6
            WHERE id = $7
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(data.points)
        .bind(&data.requirement_type)
        .bind(data.requirement_count)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.title = data.title;
        self.description = data.description;
        self.icon = data.icon;
        self.points = data.points;
        self.requirement_type = data.requirement_type;
        self.requirement_count = data.requirement_count;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM achievements WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM achievements WHERE id = $1")
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
        let result = sqlx::query_as(
            "SELECT * FROM achievements ORDER BY points, title LIMIT $1 OFFSET $2",
        )
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
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Achievement, AchievementCreate, Uuid);

#[async_trait]
impl HasDependents for Achievement {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let earned = count_where(mm, "user_achievements", "achievement_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::UserAchievement, earned)])
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AchievementCardRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub points: i32,
    pub requirement_type: String,
    pub requirement_count: i32,
    pub earned_by: i64,
}

impl AchievementCardRow {
    pub async fn fetch_all(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                a.id,
                a.title,
                a.description,
                a.icon,
                a.points,
                a.requirement_type,
                a.requirement_count,
                COUNT(ua.id) AS earned_by
            FROM achievements a
            LEFT JOIN user_achievements ua ON ua.achievement_id = a.id
            GROUP BY a.id
            ORDER BY a.points, a.title
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
