use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares},
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(session_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/session",
    description = "Profile behind the current session token. Any role may call it",
    responses(
        (status = 200, description = "Signed in", body = UserEntity),
        (status = 400, description = "Session token invalid", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "session"
)]
pub(crate) async fn session_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let profile = UserEntity::find_by_id(state.pool(), user, user.user_id())
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(WebError::auth_required)?;

    Ok((StatusCode::OK, Json(profile)))
}
