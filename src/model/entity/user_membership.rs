use crate::impl_paginatable_for;
use crate::model::entity::MembershipPlan;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const MEMBERSHIP_STATUSES: [&str; 3] = ["active", "cancelled", "expired"];

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Membership {
    id: Uuid,
    user_id: Uuid,
    plan_id: Uuid,
    status: String,
    started_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ResourceTyped for Membership {
    fn get_resource_type() -> ResourceType {
        ResourceType::Membership
    }
}

impl Membership {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn started_at(&self) -> &DateTime<Utc> {
        &self.started_at
    }

    pub fn expires_at(&self) -> &DateTime<Utc> {
        &self.expires_at
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MembershipCreate {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl MembershipCreate {
    /// Active membership starting at `now` for the plan's duration. `None`
    /// when the expiry falls outside the representable date range.
    pub fn starting(user_id: Uuid, plan: &MembershipPlan, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = Duration::try_days(i64::from(plan.duration_days()))
            .and_then(|d| now.checked_add_signed(d))?;

        Some(Self {
            user_id,
            plan_id: plan.id(),
            status: String::from("active"),
            started_at: now,
            expires_at,
        })
    }
}

#[async_trait]
impl CrudRepository<Membership, MembershipCreate, Uuid> for Membership {
    async fn create(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        data: MembershipCreate,
    ) -> DatabaseResult<Self> {
        Self::start(mm, actor, data).await
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: MembershipCreate,
    ) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        if data.status == "active" {
            sqlx::query(
                r#"
                UPDATE user_memberships SET status = 'cancelled'
                WHERE user_id = $1 AND status = 'active' AND id <> $2
                "#,
            )
            .bind(data.user_id)
            .bind(self.id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE user_memberships
            SET user_id = $1, plan_id = $2, status = $3, started_at = $4, expires_at = $5
            WHERE id = $6
            "#,
        )
        .bind(data.user_id)
        .bind(data.plan_id)
        .bind(&data.status)
        .bind(data.started_at)
        .bind(data.expires_at)
        .bind(self.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.user_id = data.user_id;
        self.plan_id = data.plan_id;
        self.status = data.status;
        self.started_at = data.started_at;
        self.expires_at = data.expires_at;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM user_memberships WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM user_memberships WHERE id = $1")
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
            SELECT * FROM user_memberships
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY started_at DESC
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
            "SELECT COUNT(*) FROM user_memberships WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(scope)
        .fetch_one(mm.executor())
        .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Membership, MembershipCreate, Uuid);

impl Membership {
    /// Cancels the user's other active memberships and starts a new one, in
    /// one transaction.
    pub async fn start(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: MembershipCreate,
    ) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        let cancelled = sqlx::query(
            "UPDATE user_memberships SET status = 'cancelled' WHERE user_id = $1 AND status = 'active'",
        )
        .bind(data.user_id)
        .execute(&mut *tx)
        .await?;

        let row: Self = sqlx::query_as(
            r#"
            INSERT INTO user_memberships (id, user_id, plan_id, status, started_at, expires_at)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.plan_id)
        .bind(&data.status)
        .bind(data.started_at)
        .bind(data.expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(
            "membership {} started for user {}, {} previous cancelled",
            row.id,
            row.user_id,
            cancelled.rows_affected()
        );
        Ok(row)
    }

    /// Changes only the status. Reactivating cancels the user's other active
    /// memberships.
    pub async fn set_status(
        self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        status: String,
    ) -> DatabaseResult<Self> {
        let data = MembershipCreate {
            user_id: self.user_id,
            plan_id: self.plan_id,
            status,
            started_at: self.started_at,
            expires_at: self.expires_at,
        };
        self.update(mm, actor, data).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn plan(duration_days: i32) -> MembershipPlan {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "name": "Plus",
            "description": null,
            "price_cents": 999,
            "duration_days": duration_days,
            "features": [],
            "is_active": true,
            "created_at": Utc::now(),
        }))
        .unwrap()
    }

    #[test]
    fn starting_runs_for_the_plan_duration() {
        let now = Utc::now();
        let user_id = Uuid::new_v4();
        let plan = plan(30);

        let data = MembershipCreate::starting(user_id, &plan, now).unwrap();
        assert_eq!(data.status, "active");
        assert_eq!(data.plan_id, plan.id());
        assert_eq!(data.started_at, now);
        assert_eq!(data.expires_at - now, Duration::days(30));
    }

    #[test]
    fn starting_rejects_expiry_out_of_range() {
        let plan = plan(i32::MAX);
        assert!(MembershipCreate::starting(Uuid::new_v4(), &plan, Utc::now()).is_none());
    }
}
