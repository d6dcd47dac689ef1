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
        entity::{LearningModule, LearningModuleCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            modules::LearningModuleForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, impact_of, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModuleListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the modules of this category
    pub category_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(modules_list_handler).post(modules_create_handler))
        .route(
            "/{id}",
            get(modules_get_handler)
                .put(modules_update_handler)
                .delete(modules_delete_handler),
        )
        .route("/{id}/impact", get(modules_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/",
    description = "Page of learning modules, optionally only those of one category",
    params(ModuleListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<LearningModule>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ModuleListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = LearningModule::page(state.pool(), user, query.category_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(LearningModule::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}",
    params(("id" = Uuid, Path, description = "ID of the module")),
    responses(
        (status = 200, description = "Module found", body = LearningModule),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<LearningModule, LearningModuleCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/modules/",
    request_body = LearningModuleForm,
    description = "Adds a learning module. Points default to 10 and are at least 1",
    responses(
        (status = 201, description = "Module created", body = LearningModule),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<LearningModuleForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(LearningModule::get_resource_type(), e))?;

    let created = LearningModule::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(LearningModule::get_resource_type(), e))?;

    tracing::info!("module `{}` created", created.title());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/modules/{id}",
    request_body = LearningModuleForm,
    params(("id" = Uuid, Path, description = "ID of the module")),
    responses(
        (status = 200, description = "Module updated", body = LearningModule),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LearningModuleForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<LearningModule, LearningModuleCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(LearningModule::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(LearningModule::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/modules/{id}/impact",
    description = "Number of exercises deleted together with the module",
    params(("id" = Uuid, Path, description = "ID of the module")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<LearningModule, LearningModuleCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/modules/{id}",
    description = "Deletes the module and its exercises. Redirects to the module list of its category",
    params(("id" = Uuid, Path, description = "ID of the module")),
    responses(
        (status = 200, description = "Module deleted", body = DeletedResponse),
        (status = 404, description = "Module not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "modules"
)]
pub(crate) async fn modules_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<LearningModule, LearningModuleCreate>(&state, user, id).await?;
    let category_id = found.category_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(LearningModule::get_resource_type(), e))?;

    tracing::info!("module {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            LearningModule::get_resource_type(),
            id,
            "category_id",
            category_id,
        )),
    ))
}
