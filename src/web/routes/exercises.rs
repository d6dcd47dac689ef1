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
        entity::{Exercise, ExerciseCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            cards::ExercisePreview,
            common::{DeletedResponse, ImpactResponse},
            exercises::{ExerciseEditorResponse, ExerciseForm},
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExerciseListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the exercises of this module
    pub module_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(exercises_list_handler).post(exercises_create_handler))
        .route(
            "/{id}",
            get(exercises_get_handler)
                .put(exercises_update_handler)
                .delete(exercises_delete_handler),
        )
        .route("/{id}/impact", get(exercises_impact_handler))
        .route("/{id}/form", get(exercises_form_handler))
        .route("/{id}/preview", get(exercises_preview_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/",
    description = "Page of exercises, optionally only those of one module",
    params(ExerciseListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Exercise>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ExerciseListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = Exercise::page(state.pool(), user, query.module_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}",
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Exercise found", body = Exercise),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/exercises/",
    request_body = ExerciseForm,
    description = "Adds an exercise. Only the sub-form selected by `exercise_type` is validated and stored",
    responses(
        (status = 201, description = "Exercise created", body = Exercise),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<ExerciseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Exercise::get_resource_type(), e))?;

    let created = Exercise::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    tracing::info!("{} exercise `{}` created", created.exercise_type(), created.title());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/exercises/{id}",
    request_body = ExerciseForm,
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Exercise updated", body = Exercise),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExerciseForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Exercise::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}/impact",
    description = "Delete confirmation. Exercises have no dependent records",
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;
    let impact = ImpactResponse::new(Exercise::get_resource_type(), id, vec![]);

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/exercises/{id}",
    description = "Deletes the exercise. Redirects to the exercise list of its module",
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Exercise deleted", body = DeletedResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;
    let module_id = found.module_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Exercise::get_resource_type(), e))?;

    tracing::info!("exercise {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            Exercise::get_resource_type(),
            id,
            "module_id",
            module_id,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}/form",
    description = "Edit view of the exercise: the stored type plus all three sub-forms, the active one filled from `content`. \
        Content that does not fit its type yields an empty sub-form; an unknown type falls back to multiple choice",
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Editor state", body = ExerciseEditorResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_form_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(ExerciseEditorResponse::from(&found))))
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}/preview",
    description = "Preview card: type label and a one-line summary of the content",
    params(("id" = Uuid, Path, description = "ID of the exercise")),
    responses(
        (status = 200, description = "Preview card", body = ExercisePreview),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "exercises"
)]
pub(crate) async fn exercises_preview_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Exercise, ExerciseCreate>(&state, user, id).await?;
    let preview = ExercisePreview::new(&found, &found.editor());

    Ok((StatusCode::OK, Json(preview)))
}
