use crate::{
    Config,
    model::{CrudRepository, HasDependents, ResourceTyped},
    web::{
        AppState, AuthenticatedUser, WebError, WebResult, doc::ApiDoc,
        dto::common::ImpactResponse,
    },
};
use axum::Router;
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub mod achievements;
pub mod categories;
pub mod courses;
pub mod dashboard;
pub mod exercises;
pub mod languages;
pub mod lessons;
pub mod memberships;
pub mod modules;
pub mod plans;
pub mod richtext;
pub mod sentences;
pub mod session;
pub mod users;
pub mod words;

pub const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, 20 when omitted
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn window(&self, config: &Config) -> (i64, i64) {
        page_window(self.limit, self.offset, config.app().page_limit())
    }
}

/// Clamps a requested page to `1..=max` rows starting at a non-negative
/// offset.
pub fn page_window(limit: Option<i64>, offset: Option<i64>, max: i64) -> (i64, i64) {
    let max = max.max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, max);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

pub(crate) async fn find_or_not_found<T, C>(
    state: &AppState,
    actor: &AuthenticatedUser,
    id: Uuid,
) -> WebResult<T>
where
    T: CrudRepository<T, C, Uuid> + ResourceTyped,
{
    <T as CrudRepository<T, C, Uuid>>::find_by_id(state.pool(), actor, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(T::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(T::get_resource_type()))
}

pub(crate) async fn impact_of<T>(
    state: &AppState,
    actor: &AuthenticatedUser,
    id: Uuid,
    record: &T,
) -> WebResult<ImpactResponse>
where
    T: HasDependents + ResourceTyped + Sync,
{
    let dependents = record
        .dependents(state.pool(), actor)
        .await
        .map_err(|e| WebError::resource_fetch_error(T::get_resource_type(), e))?;

    Ok(ImpactResponse::new(T::get_resource_type(), id, dependents))
}

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .nest("/api/v1/session", session::routes(state.clone()))
        .nest("/api/v1/languages/", languages::routes(state.clone()))
        .nest("/api/v1/courses/", courses::routes(state.clone()))
        .nest("/api/v1/lessons/", lessons::routes(state.clone()))
        .nest("/api/v1/categories/", categories::routes(state.clone()))
        .nest("/api/v1/modules/", modules::routes(state.clone()))
        .nest("/api/v1/exercises/", exercises::routes(state.clone()))
        .nest("/api/v1/words/", words::routes(state.clone()))
        .nest("/api/v1/sentences/", sentences::routes(state.clone()))
        .nest("/api/v1/achievements/", achievements::routes(state.clone()))
        .nest("/api/v1/plans/", plans::routes(state.clone()))
        .nest("/api/v1/users/", users::routes(state.clone()))
        .nest("/api/v1/memberships/", memberships::routes(state.clone()))
        .nest("/api/v1/dashboard/", dashboard::routes(state.clone()))
        .nest("/api/v1/richtext/", richtext::routes(state.clone()))
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .with_state(state);

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/api/v1/docs").url("/api-doc/openapi.json", openapi));
    }

    router
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn page_window_clamps() {
        assert_eq!(page_window(None, None, 100), (20, 0));
        assert_eq!(page_window(Some(0), Some(-5), 100), (1, 0));
        assert_eq!(page_window(Some(500), Some(40), 100), (100, 40));
        assert_eq!(page_window(None, None, 10), (10, 0));
        assert_eq!(page_window(Some(5), None, 0), (1, 0));
    }
}
