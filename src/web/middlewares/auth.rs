use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    auth,
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";
static AUTH_HEADER: &str = "Authorization";

/// Resolves the session token (cookie first, then bearer header) into a
/// [`RequestContext`]. A request without a token, or whose subject has no
/// profile row, continues anonymously.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(cookie) => Some((AUTH_TOKEN, cookie.value().to_string())),
        None => req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(auth::bearer_token)
            .map(|t| (AUTH_HEADER, t.to_string())),
    };

    let Some((source, token)) = token else {
        req.extensions_mut().insert(RequestContext::new(None));
        return Ok(next.run(req).await);
    };

    let claims = auth::process_token(&token, state.config().app().jwt())
        .map_err(|e| WebError::auth_token_invalid(source, e))?;

    let id = claims
        .claims
        .sub
        .parse::<uuid::Uuid>()
        .map_err(|e| WebError::auth_token_invalid(source, e))?;

    let profile = UserEntity::find_by_id(state.pool(), &AuthenticatedUser::system(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    match profile {
        Some(profile) => {
            tracing::debug!("request by {} ({})", profile.email(), profile.role());
            req.extensions_mut().insert(RequestContext::new(Some(
                AuthenticatedUser::new(id, profile.role()),
            )));
            Ok(next.run(req).await)
        }
        None => {
            tracing::debug!("token subject {id} has no profile");
            req.extensions_mut().insert(RequestContext::new(None));
            Ok(next.run(req).await)
        }
    }
}
