use crate::impl_paginatable_for;
use crate::model::dependents::{Dependent, HasDependents, count_where};
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, ResourceType, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct MembershipPlan {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i32,
    duration_days: i32,
    #[sqlx(json)]
    features: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for MembershipPlan {
    fn get_resource_type() -> ResourceType {
        ResourceType::MembershipPlan
    }
}

impl MembershipPlan {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_cents(&self) -> i32 {
        self.price_cents
    }

    pub fn duration_days(&self) -> i32 {
        self.duration_days
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MembershipPlanCreate {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i32,
    pub duration_days: i32,
    pub features: Vec<String>,
    pub is_active: bool,
}

#[async_trait]
impl CrudRepository<MembershipPlan, MembershipPlanCreate, Uuid> for MembershipPlan {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: MembershipPlanCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO membership_plans
                (id, name, description, price_cents, duration_days, features, is_active)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.duration_days)
        .bind(Json(&data.features))
        .bind(data.is_active)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: MembershipPlanCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE membership_plans
            SET name = $1, description = $2, price_cents = $3, duration_days = $4,
                features = $5, is_active = $6
            WHERE id = $7
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.duration_days)
        .bind(Json(&data.features))
        .bind(data.is_active)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.name = data.name;
        self.description = data.description;
        self.price_cents = data.price_cents;
        self.duration_days = data.duration_days;
        self.features = data.features;
        self.is_active = data.is_active;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM membership_plans WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM membership_plans WHERE id = $1")
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
            "SELECT * FROM membership_plans ORDER BY price_cents, name LIMIT $1 OFFSET $2",
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
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM membership_plans")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(MembershipPlan, MembershipPlanCreate, Uuid);

#[async_trait]
impl HasDependents for MembershipPlan {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let memberships = count_where(mm, "user_memberships", "plan_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::Membership, memberships)])
    }
}
