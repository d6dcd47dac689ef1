use crate::impl_paginatable_for;
use crate::model::dependents::{Dependent, HasDependents, count_where};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::{AuthenticatedUser, UserRole};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Profile row mirroring an identity of the external auth provider; `id` is
/// the provider's subject.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: Uuid,
    email: String,
    display_name: String,
    avatar_url: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserEntityCreateUpdate {
    /// Subject of the provider identity; a fresh id is generated when absent.
    pub id: Option<Uuid>,
    pub email: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub role: UserRole,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> ResourceType {
        ResourceType::User
    }
}

impl UserEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }
}

#[async_trait]
impl CrudRepository<UserEntity, UserEntityCreateUpdate, Uuid> for UserEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreateUpdate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO users (id, email, display_name, avatar_url, role)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(data.id.unwrap_or_else(Uuid::new_v4))
        .bind(&data.email)
        .bind(&data.display_name)
        .bind(&data.avatar_url)
        .bind(data.role.to_string())
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    /// E-mail belongs to the auth provider and is left untouched.
    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreateUpdate,
    ) -> DatabaseResult<Self> {
        let role = data.role.to_string();
        sqlx::query("UPDATE users SET display_name = $1, avatar_url = $2, role = $3 WHERE id = $4")
            .bind(&data.display_name)
            .bind(&data.avatar_url)
            .bind(&role)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.display_name = data.display_name;
        self.avatar_url = data.avatar_url;
        self.role = role;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2")
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
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(UserEntity, UserEntityCreateUpdate, Uuid);

#[async_trait]
impl HasDependents for UserEntity {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let (achievements, memberships) = tokio::try_join!(
            count_where(mm, "user_achievements", "user_id", self.id),
            count_where(mm, "user_memberships", "user_id", self.id),
        )?;

        Ok(vec![
            Dependent::new(ResourceType::UserAchievement, achievements),
            Dependent::new(ResourceType::Membership, memberships),
        ])
    }
}

impl UserEntity {
    pub async fn find_by_email(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        email: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProgressRow {
    pub user_id: Uuid,
    pub display_name: String,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    pub achievements_earned: i64,
    pub achievement_points: i64,
    pub plan_name: Option<String>,
    pub membership_expires_at: Option<DateTime<Utc>>,
}

impl UserProgressRow {
    pub async fn fetch(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
                u.id AS user_id,
                u.display_name,
                COALESCE(s.current_streak, 0) AS current_streak,
                COALESCE(s.longest_streak, 0) AS longest_streak,
                s.last_activity_date,
                (SELECT COUNT(*) FROM user_achievements ua WHERE ua.user_id = u.id) AS achievements_earned,
                (
                    SELECT COALESCE(SUM(a.points), 0)::BIGINT
                    FROM user_achievements ua
                    JOIN achievements a ON a.id = ua.achievement_id
                    WHERE ua.user_id = u.id
                ) AS achievement_points,
                m.plan_name,
                m.expires_at AS membership_expires_at
            FROM users u
            LEFT JOIN user_streaks s ON s.user_id = u.id
            LEFT JOIN LATERAL (
                SELECT p.name AS plan_name, um.expires_at
                FROM user_memberships um
                JOIN membership_plans p ON p.id = um.plan_id
                WHERE um.user_id = u.id AND um.status = 'active' AND um.expires_at > now()
                ORDER BY um.expires_at DESC
                LIMIT 1
            ) m ON TRUE
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }
}
