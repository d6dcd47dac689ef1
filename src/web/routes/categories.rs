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
        entity::{Category, CategoryCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            categories::CategoryForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{ListQuery, find_or_not_found, impact_of},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(categories_list_handler).post(categories_create_handler))
        .route(
            "/{id}",
            get(categories_get_handler)
                .put(categories_update_handler)
                .delete(categories_delete_handler),
        )
        .route("/{id}/impact", get(categories_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/",
    description = "Page of learning categories in display order",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Category>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = query.window(state.config());

    let page = Category::page(state.pool(), user, None, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Category::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(("id" = Uuid, Path, description = "ID of the category")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Category, CategoryCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories/",
    request_body = CategoryForm,
    description = "Adds a learning category",
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<CategoryForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Category::get_resource_type(), e))?;

    let created = Category::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Category::get_resource_type(), e))?;

    tracing::info!("category `{}` created", created.name());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    request_body = CategoryForm,
    params(("id" = Uuid, Path, description = "ID of the category")),
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Category, CategoryCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Category::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Category::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}/impact",
    description = "Number of learning modules deleted together with the category",
    params(("id" = Uuid, Path, description = "ID of the category")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Category, CategoryCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    description = "Deletes the category with all its modules and their exercises",
    params(("id" = Uuid, Path, description = "ID of the category")),
    responses(
        (status = 200, description = "Category deleted", body = DeletedResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "categories"
)]
pub(crate) async fn categories_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Category, CategoryCreate>(&state, user, id).await?;

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Category::get_resource_type(), e))?;

    tracing::info!("category {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_collection(Category::get_resource_type(), id)),
    ))
}
