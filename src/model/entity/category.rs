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
pub struct Category {
    id: Uuid,
    name: String,
    description: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    order_index: i32,
    created_at: DateTime<Utc>,
}

impl ResourceTyped for Category {
    fn get_resource_type() -> ResourceType {
        ResourceType::Category
    }
}

impl Category {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub order_index: i32,
}

#[async_trait]
impl CrudRepository<Category, CategoryCreate, Uuid> for Category {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CategoryCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO learning_categories (id, name, description, icon, color, order_index)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.icon)
        .bind(&data.color)
        .bind(data.order_index)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CategoryCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query("UPDATE learning_categories SET name = $1, description = $2, icon = $3, color = $4, order_index = $5 WHERE id = $6")
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.icon)
            .bind(&data.color)
            .bind(data.order_index)
            .bind(self.id)
            .execute(mm.executor())
            .await?;

        self.name = data.name;
        self.description = data.description;
        self.icon = data.icon;
        self.color = data.color;
        self.order_index = data.order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM learning_categories WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM learning_categories WHERE id = $1")
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
            "SELECT * FROM learning_categories ORDER BY order_index, name LIMIT $1 OFFSET $2",
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
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM learning_categories")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl_paginatable_for!(Category, CategoryCreate, Uuid);

#[async_trait]
impl HasDependents for Category {
    async fn dependents(
        &self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>> {
        let modules = count_where(mm, "learning_modules", "category_id", self.id).await?;
        Ok(vec![Dependent::new(ResourceType::Module, modules)])
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryCardRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub module_count: i64,
}

impl CategoryCardRow {
    pub async fn fetch_all(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                c.id,
                c.name,
                c.description,
                c.icon,
                c.color,
                COUNT(m.id) AS module_count
            FROM learning_categories c
            LEFT JOIN learning_modules m ON m.category_id = c.id
            GROUP BY c.id
            ORDER BY c.order_index, c.name
            "#,
        )
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
