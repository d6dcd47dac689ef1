use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::{
    model::{DatabaseResult, ModelManager, ResourceType, ResourceTyped},
    web::AuthenticatedUser,
};

pub const DEFAULT_DAILY_GOAL_MINUTES: i32 = 10;

/// One row per user, created on first save.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserPreference {
    user_id: Uuid,
    daily_goal_minutes: i32,
    target_language_id: Option<Uuid>,
    notifications_enabled: bool,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserPreferenceUpdate {
    pub daily_goal_minutes: i32,
    pub target_language_id: Option<Uuid>,
    pub notifications_enabled: bool,
}

impl ResourceTyped for UserPreference {
    fn get_resource_type() -> ResourceType {
        ResourceType::UserPreference
    }
}

impl UserPreference {
    pub fn defaults_for(user_id: Uuid) -> Self {
        Self {
            user_id,
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
            target_language_id: None,
            notifications_enabled: true,
            updated_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn daily_goal_minutes(&self) -> i32 {
        self.daily_goal_minutes
    }

    pub fn target_language_id(&self) -> Option<Uuid> {
        self.target_language_id
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub async fn find_by_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    pub async fn find_or_default(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Self> {
        Ok(Self::find_by_user(mm, actor, user_id)
            .await?
            .unwrap_or_else(|| Self::defaults_for(user_id)))
    }

    pub async fn upsert(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        data: UserPreferenceUpdate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_preferences (user_id, daily_goal_minutes, target_language_id, notifications_enabled)
            VALUES ($1,$2,$3,$4)
            ON CONFLICT (user_id) DO UPDATE
            SET daily_goal_minutes = EXCLUDED.daily_goal_minutes,
                target_language_id = EXCLUDED.target_language_id,
                notifications_enabled = EXCLUDED.notifications_enabled,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.daily_goal_minutes)
        .bind(data.target_language_id)
        .bind(data.notifications_enabled)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }
}
