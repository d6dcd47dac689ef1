use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped,
        entity::{Achievement, AchievementCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            achievements::AchievementForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{ListQuery, find_or_not_found, impact_of},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(achievements_list_handler).post(achievements_create_handler))
        .route(
            "/{id}",
            get(achievements_get_handler)
                .put(achievements_update_handler)
                .delete(achievements_delete_handler),
        )
        .route("/{id}/impact", get(achievements_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/achievements/",
    description = "Page of achievements",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Achievement>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = query.window(state.config());

    let page = Achievement::page(state.pool(), user, None, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Achievement::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/achievements/{id}",
    params(("id" = Uuid, Path, description = "ID of the achievement")),
    responses(
        (status = 200, description = "Achievement found", body = Achievement),
        (status = 404, description = "Achievement not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Achievement, AchievementCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/achievements/",
    request_body = AchievementForm,
    description = "Adds an achievement. Points default to 10 and the requirement count to 1",
    responses(
        (status = 201, description = "Achievement created", body = Achievement),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<AchievementForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Achievement::get_resource_type(), e))?;

    let created = Achievement::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Achievement::get_resource_type(), e))?;

    tracing::info!("achievement `{}` created", created.title());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/achievements/{id}",
    request_body = AchievementForm,
    params(("id" = Uuid, Path, description = "ID of the achievement")),
    responses(
        (status = 200, description = "Achievement updated", body = Achievement),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Achievement not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AchievementForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Achievement, AchievementCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Achievement::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Achievement::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/achievements/{id}/impact",
    description = "Number of users who earned the achievement",
    params(("id" = Uuid, Path, description = "ID of the achievement")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Achievement not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Achievement, AchievementCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/achievements/{id}",
    description = "Deletes the achievement and revokes it from every user",
    params(("id" = Uuid, Path, description = "ID of the achievement")),
    responses(
        (status = 200, description = "Achievement deleted", body = DeletedResponse),
        (status = 404, description = "Achievement not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "achievements"
)]
pub(crate) async fn achievements_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Achievement, AchievementCreate>(&state, user, id).await?;

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Achievement::get_resource_type(), e))?;

    tracing::info!("achievement {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_collection(Achievement::get_resource_type(), id)),
    ))
}
