use serde::Serialize;

use crate::{
    model::{ModelManager, ResourceType, error::DatabaseResult},
    web::AuthenticatedUser,
};

/// Rows in another table that reference a record, reported before deleting it.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Dependent {
    pub resource: ResourceType,
    pub count: i64,
}

impl Dependent {
    pub fn new(resource: ResourceType, count: i64) -> Self {
        Self { resource, count }
    }
}

#[async_trait::async_trait]
pub trait HasDependents {
    async fn dependents(
        &self,
        mm: &ModelManager,
        actor: &AuthenticatedUser,
    ) -> DatabaseResult<Vec<Dependent>>;
}

pub(crate) async fn count_where(
    mm: &ModelManager,
    table: &str,
    column: &str,
    id: uuid::Uuid,
) -> DatabaseResult<i64> {
    // table/column names only ever come from literals in this crate
    let query = format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1");
    let count: i64 = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_one(mm.executor())
        .await?;
    Ok(count)
}
