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
        entity::{Language, LanguageCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            languages::LanguageForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{ListQuery, find_or_not_found, impact_of},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(languages_list_handler).post(languages_create_handler))
        .route(
            "/{id}",
            get(languages_get_handler)
                .put(languages_update_handler)
                .delete(languages_delete_handler),
        )
        .route("/{id}/impact", get(languages_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/languages/",
    description = "Page of languages ordered by name",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Language>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = query.window(state.config());

    let page = Language::page(state.pool(), user, None, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Language::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/languages/{id}",
    params(("id" = Uuid, Path, description = "ID of the language")),
    responses(
        (status = 200, description = "Language found", body = Language),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Language, LanguageCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/languages/",
    request_body = LanguageForm,
    description = "Adds a language. Codes are unique and stored lower-cased",
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 409, description = "Language code already taken", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<LanguageForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Language::get_resource_type(), e))?;

    let created = Language::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Language::get_resource_type(), e))?;

    tracing::info!("language `{}` created", created.code());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/languages/{id}",
    request_body = LanguageForm,
    params(("id" = Uuid, Path, description = "ID of the language")),
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 409, description = "Language code already taken", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LanguageForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Language, LanguageCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Language::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Language::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/languages/{id}/impact",
    description = "What deleting the language takes with it: its courses, words and the preferences targeting it",
    params(("id" = Uuid, Path, description = "ID of the language")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Language, LanguageCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/languages/{id}",
    description = "Deletes the language together with its courses and words",
    params(("id" = Uuid, Path, description = "ID of the language")),
    responses(
        (status = 200, description = "Language deleted", body = DeletedResponse),
        (status = 404, description = "Language not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "languages"
)]
pub(crate) async fn languages_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Language, LanguageCreate>(&state, user, id).await?;

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Language::get_resource_type(), e))?;

    tracing::info!("language {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_collection(Language::get_resource_type(), id)),
    ))
}
