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
        entity::{Course, CourseCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            courses::CourseForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, impact_of, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the courses of this language
    pub language_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(courses_list_handler).post(courses_create_handler))
        .route(
            "/{id}",
            get(courses_get_handler)
                .put(courses_update_handler)
                .delete(courses_delete_handler),
        )
        .route("/{id}/impact", get(courses_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/",
    description = "Page of courses in catalogue order, optionally only those of one language",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Course>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = Course::page(state.pool(), user, query.language_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "ID of the course")),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Course, CourseCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses/",
    request_body = CourseForm,
    description = "Adds a course to a language. Level defaults to beginner",
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<CourseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Course::get_resource_type(), e))?;

    let created = Course::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    tracing::info!("course `{}` created", created.title());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    request_body = CourseForm,
    params(("id" = Uuid, Path, description = "ID of the course")),
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CourseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Course, CourseCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Course::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/impact",
    description = "Number of lessons deleted together with the course",
    params(("id" = Uuid, Path, description = "ID of the course")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Course, CourseCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    description = "Deletes the course and its lessons. Redirects to the course list of its language",
    params(("id" = Uuid, Path, description = "ID of the course")),
    responses(
        (status = 200, description = "Course deleted", body = DeletedResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "courses"
)]
pub(crate) async fn courses_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Course, CourseCreate>(&state, user, id).await?;
    let language_id = found.language_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Course::get_resource_type(), e))?;

    tracing::info!("course {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            Course::get_resource_type(),
            id,
            "language_id",
            language_id,
        )),
    ))
}
