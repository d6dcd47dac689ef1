use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceType,
        entity::{
            Achievement, AchievementCardRow, Category, CategoryCardRow, Course, Exercise,
            Language, LearningModule, Lesson, MembershipPlan, ModuleCardRow, Sentence, UserEntity,
            Word,
        },
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::cards::{AchievementCard, CategoryCard, ModuleCard, OverviewCard},
        error::ErrorResponse,
        middlewares,
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleCardsQuery {
    /// Only the modules of this category
    pub category_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/overview", get(dashboard_overview_handler))
        .route("/achievements", get(dashboard_achievements_handler))
        .route("/categories", get(dashboard_categories_handler))
        .route("/modules", get(dashboard_modules_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/overview",
    description = "Row counts of every catalogue table",
    responses(
        (status = 200, description = "Overview", body = OverviewCard),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "dashboard"
)]
pub(crate) async fn dashboard_overview_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let mm = state.pool();

    let (
        languages,
        courses,
        lessons,
        categories,
        modules,
        exercises,
        words,
        sentences,
        achievements,
        plans,
        users,
    ) = tokio::try_join!(
        Language::count(mm, user, None),
        Course::count(mm, user, None),
        Lesson::count(mm, user, None),
        Category::count(mm, user, None),
        LearningModule::count(mm, user, None),
        Exercise::count(mm, user, None),
        Word::count(mm, user, None),
        Sentence::count(mm, user, None),
        Achievement::count(mm, user, None),
        MembershipPlan::count(mm, user, None),
        UserEntity::count(mm, user, None),
    )
    .map_err(|e| WebError::resource_fetch_error(ResourceType::Language, e))?;

    Ok((
        StatusCode::OK,
        Json(OverviewCard {
            languages,
            courses,
            lessons,
            categories,
            modules,
            exercises,
            words,
            sentences,
            achievements,
            plans,
            users,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/achievements",
    responses(
        (status = 200, description = "Achievement cards", body = Vec<AchievementCard>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "dashboard"
)]
pub(crate) async fn dashboard_achievements_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let cards: Vec<AchievementCard> = AchievementCardRow::fetch_all(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Achievement, e))?
        .into_iter()
        .map(AchievementCard::from)
        .collect();

    Ok((StatusCode::OK, Json(cards)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/categories",
    responses(
        (status = 200, description = "Category cards", body = Vec<CategoryCard>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "dashboard"
)]
pub(crate) async fn dashboard_categories_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let cards: Vec<CategoryCard> = CategoryCardRow::fetch_all(state.pool(), user)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Category, e))?
        .into_iter()
        .map(CategoryCard::from)
        .collect();

    Ok((StatusCode::OK, Json(cards)))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/modules",
    params(ModuleCardsQuery),
    responses(
        (status = 200, description = "Module cards", body = Vec<ModuleCard>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "dashboard"
)]
pub(crate) async fn dashboard_modules_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ModuleCardsQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let cards: Vec<ModuleCard> = ModuleCardRow::fetch_all(state.pool(), user, query.category_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Module, e))?
        .into_iter()
        .map(ModuleCard::from)
        .collect();

    Ok((StatusCode::OK, Json(cards)))
}
