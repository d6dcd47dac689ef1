use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, routing::post};

use crate::{
    forms::richtext::{self, Edit},
    web::{
        AppState, RequestContext, WebResult, dto::richtext::FormatRequest, error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/format", post(richtext_format_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/richtext/format",
    request_body = FormatRequest,
    description = "Wraps the selected characters of the lesson editor in markup and returns the new text with the restored selection",
    responses(
        (status = 200, description = "Formatted text", body = Edit),
        (status = 400, description = "No selection or empty markup", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "richtext"
)]
pub(crate) async fn richtext_format_handler(
    ctx: RequestContext,
    Json(payload): Json<FormatRequest>,
) -> WebResult<impl IntoResponse> {
    ctx.admin()?;
    let edit = richtext::apply(&payload.text, payload.selection, &payload.markup)?;

    Ok((StatusCode::OK, Json(edit)))
}
