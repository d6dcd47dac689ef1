use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{Membership, MembershipCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{common::DeletedResponse, users::MembershipStatusForm},
        error::ErrorResponse,
        middlewares,
        routes::find_or_not_found,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route(
            "/{id}",
            get(memberships_get_handler)
                .put(memberships_update_handler)
                .delete(memberships_delete_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/memberships/{id}",
    params(("id" = Uuid, Path, description = "ID of the membership")),
    responses(
        (status = 200, description = "Membership found", body = Membership),
        (status = 404, description = "Membership not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "memberships"
)]
pub(crate) async fn memberships_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Membership, MembershipCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    put,
    path = "/api/v1/memberships/{id}",
    request_body = MembershipStatusForm,
    description = "Changes the membership status",
    params(("id" = Uuid, Path, description = "ID of the membership")),
    responses(
        (status = 200, description = "Membership updated", body = Membership),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "memberships"
)]
pub(crate) async fn memberships_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MembershipStatusForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Membership, MembershipCreate>(&state, user, id).await?;
    let status = payload
        .validate()
        .map_err(|e| WebError::validation(Membership::get_resource_type(), e))?;

    let updated = found
        .set_status(state.pool(), user, status)
        .await
        .map_err(|e| WebError::from_db(Membership::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/memberships/{id}",
    description = "Deletes the membership. Redirects to the membership list of its user",
    params(("id" = Uuid, Path, description = "ID of the membership")),
    responses(
        (status = 200, description = "Membership deleted", body = DeletedResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "memberships"
)]
pub(crate) async fn memberships_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Membership, MembershipCreate>(&state, user, id).await?;
    let user_id = found.user_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Membership::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(DeletedResponse::new(
            id,
            format!("/api/v1/users/{user_id}/memberships"),
        )),
    ))
}
