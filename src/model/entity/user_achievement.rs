use crate::impl_paginatable_for;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// An achievement granted to a user. `list`/`count` are scoped by user.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserAchievement {
    id: Uuid,
    user_id: Uuid,
    achievement_id: Uuid,
    earned_at: DateTime<Utc>,
}

impl ResourceTyped for UserAchievement {
    fn get_resource_type() -> ResourceType {
        ResourceType::UserAchievement
    }
}

impl UserAchievement {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn achievement_id(&self) -> Uuid {
        self.achievement_id
    }

    pub fn earned_at(&self) -> &DateTime<Utc> {
        &self.earned_at
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserAchievementCreate {
    pub user_id: Uuid,
    pub achievement_id: Uuid,
}

#[async_trait]
impl CrudRepository<UserAchievement, UserAchievementCreate, Uuid> for UserAchievement {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserAchievementCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            "INSERT INTO user_achievements (id, user_id, achievement_id) VALUES ($1,$2,$3) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.achievement_id)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserAchievementCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE user_achievements SET user_id = $1, achievement_id = $2 WHERE id = $3")
            .bind(data.user_id)
            .bind(data.achievement_id)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.user_id = data.user_id;
        self.achievement_id = data.achievement_id;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM user_achievements WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM user_achievements WHERE id = $1")
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
            SELECT * FROM user_achievements
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY earned_at DESC
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
            "SELECT COUNT(*) FROM user_achievements WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserAchievement, UserAchievementCreate, Uuid);

impl UserAchievement {
    pub async fn find_for_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        achievement_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM user_achievements WHERE user_id = $1 AND achievement_id = $2",
        )
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct EarnedAchievementRow {
    pub id: Uuid,
    pub achievement_id: Uuid,
    pub title: String,
    pub icon: Option<String>,
    pub points: i32,
    pub earned_at: DateTime<Utc>,
}

impl EarnedAchievementRow {
    pub async fn fetch_for_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT ua.id, ua.achievement_id, a.title, a.icon, a.points, ua.earned_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = $1
            ORDER BY ua.earned_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
