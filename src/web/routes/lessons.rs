use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceTyped,
        entity::{Lesson, LessonCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            lessons::LessonForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LessonListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the lessons of this course
    pub course_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(lessons_list_handler).post(lessons_create_handler))
        .route(
            "/{id}",
            get(lessons_get_handler)
                .put(lessons_update_handler)
                .delete(lessons_delete_handler),
        )
        .route("/{id}/impact", get(lessons_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/",
    description = "Page of lessons in course order",
    params(LessonListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Lesson>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<LessonListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = Lesson::page(state.pool(), user, query.course_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}",
    params(("id" = Uuid, Path, description = "ID of the lesson")),
    responses(
        (status = 200, description = "Lesson found", body = Lesson),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Lesson, LessonCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/lessons/",
    request_body = LessonForm,
    description = "Adds a lesson. Content is rich text as produced by the formatting helper",
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<LessonForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Lesson::get_resource_type(), e))?;

    let created = Lesson::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson `{}` created", created.title());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lessons/{id}",
    request_body = LessonForm,
    params(("id" = Uuid, Path, description = "ID of the lesson")),
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LessonForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Lesson, LessonCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Lesson::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{id}/impact",
    description = "Delete confirmation. Lessons have no dependent records",
    params(("id" = Uuid, Path, description = "ID of the lesson")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_or_not_found::<Lesson, LessonCreate>(&state, user, id).await?;
    let impact = ImpactResponse::new(Lesson::get_resource_type(), id, vec![]);

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/lessons/{id}",
    description = "Deletes the lesson. Redirects to the lesson list of its course",
    params(("id" = Uuid, Path, description = "ID of the lesson")),
    responses(
        (status = 200, description = "Lesson deleted", body = DeletedResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "lessons"
)]
pub(crate) async fn lessons_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Lesson, LessonCreate>(&state, user, id).await?;
    let course_id = found.course_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Lesson::get_resource_type(), e))?;

    tracing::info!("lesson {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            Lesson::get_resource_type(),
            id,
            "course_id",
            course_id,
        )),
    ))
}
