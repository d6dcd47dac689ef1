use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::{
    model::{DatabaseResult, ModelManager, ResourceType, ResourceTyped},
    web::AuthenticatedUser,
};

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserStreak {
    user_id: Uuid,
    current_streak: i32,
    longest_streak: i32,
    last_activity_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserStreakUpdate {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
}

impl UserStreakUpdate {
    /// The longest streak can never be shorter than the current one.
    pub fn normalized(mut self) -> Self {
        self.current_streak = self.current_streak.max(0);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self
    }
}

impl ResourceTyped for UserStreak {
    fn get_resource_type() -> ResourceType {
        ResourceType::UserStreak
    }
}

impl UserStreak {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn current_streak(&self) -> i32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> i32 {
        self.longest_streak
    }

    pub async fn find_or_empty(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Self> {
        let result: Option<Self> = sqlx::query_as("SELECT * FROM user_streaks WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result.unwrap_or_else(|| Self::empty(user_id)))
    }

    pub async fn upsert(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
        data: UserStreakUpdate,
    ) -> DatabaseResult<Self> {
        let data = data.normalized();
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_streaks (user_id, current_streak, longest_streak, last_activity_date)
            VALUES ($1,$2,$3,$4)
            ON CONFLICT (user_id) DO UPDATE
            SET current_streak = EXCLUDED.current_streak,
                longest_streak = EXCLUDED.longest_streak,
                last_activity_date = EXCLUDED.last_activity_date
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(data.current_streak)
        .bind(data.longest_streak)
        .bind(data.last_activity_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    pub async fn reset(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM user_streaks WHERE user_id = $1")
            .bind(user_id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn longest_follows_current() {
        let update = UserStreakUpdate {
            current_streak: 12,
            longest_streak: 3,
            last_activity_date: None,
        }
        .normalized();
        assert_eq!(update.longest_streak, 12);

        let update = UserStreakUpdate {
            current_streak: -4,
            longest_streak: 0,
            last_activity_date: None,
        }
        .normalized();
        assert_eq!(update.current_streak, 0);
        assert_eq!(update.longest_streak, 0);
    }
}
