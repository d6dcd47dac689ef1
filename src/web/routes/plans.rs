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
        entity::{MembershipPlan, MembershipPlanCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            plans::MembershipPlanForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{ListQuery, find_or_not_found, impact_of},
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(plans_list_handler).post(plans_create_handler))
        .route(
            "/{id}",
            get(plans_get_handler)
                .put(plans_update_handler)
                .delete(plans_delete_handler),
        )
        .route("/{id}/impact", get(plans_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/plans/",
    description = "Page of membership plans",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<MembershipPlan>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = query.window(state.config());

    let page = MembershipPlan::page(state.pool(), user, None, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(MembershipPlan::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}",
    params(("id" = Uuid, Path, description = "ID of the membership plan")),
    responses(
        (status = 200, description = "Membership plan found", body = MembershipPlan),
        (status = 404, description = "Membership plan not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<MembershipPlan, MembershipPlanCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/plans/",
    request_body = MembershipPlanForm,
    description = "Adds a membership plan. Names are unique",
    responses(
        (status = 201, description = "Membership plan created", body = MembershipPlan),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 409, description = "Plan name already taken", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<MembershipPlanForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(MembershipPlan::get_resource_type(), e))?;

    let created = MembershipPlan::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(MembershipPlan::get_resource_type(), e))?;

    tracing::info!("membership plan `{}` created", created.name());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/plans/{id}",
    request_body = MembershipPlanForm,
    params(("id" = Uuid, Path, description = "ID of the membership plan")),
    responses(
        (status = 200, description = "Membership plan updated", body = MembershipPlan),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Membership plan not found", body = ErrorResponse),
        (status = 409, description = "Plan name already taken", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MembershipPlanForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<MembershipPlan, MembershipPlanCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(MembershipPlan::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(MembershipPlan::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/plans/{id}/impact",
    description = "Number of memberships deleted together with the plan",
    params(("id" = Uuid, Path, description = "ID of the membership plan")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Membership plan not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<MembershipPlan, MembershipPlanCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/plans/{id}",
    description = "Deletes the plan and every membership on it",
    params(("id" = Uuid, Path, description = "ID of the membership plan")),
    responses(
        (status = 200, description = "Membership plan deleted", body = DeletedResponse),
        (status = 404, description = "Membership plan not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "plans"
)]
pub(crate) async fn plans_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<MembershipPlan, MembershipPlanCreate>(&state, user, id).await?;

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(MembershipPlan::get_resource_type(), e))?;

    tracing::info!("membership plan {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_collection(MembershipPlan::get_resource_type(), id)),
    ))
}
