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
        entity::{Word, WordCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            words::WordForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, impact_of, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WordListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the words of this language
    pub language_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(words_list_handler).post(words_create_handler))
        .route(
            "/{id}",
            get(words_get_handler)
                .put(words_update_handler)
                .delete(words_delete_handler),
        )
        .route("/{id}/impact", get(words_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/words/",
    description = "Page of vocabulary words, optionally only those of one language",
    params(WordListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Word>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<WordListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = Word::page(state.pool(), user, query.language_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Word::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/words/{id}",
    params(("id" = Uuid, Path, description = "ID of the word")),
    responses(
        (status = 200, description = "Word found", body = Word),
        (status = 404, description = "Word not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Word, WordCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/words/",
    request_body = WordForm,
    description = "Adds a vocabulary word",
    responses(
        (status = 201, description = "Word created", body = Word),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<WordForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Word::get_resource_type(), e))?;

    let created = Word::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Word::get_resource_type(), e))?;

    tracing::info!("word `{}` created", created.word());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/words/{id}",
    request_body = WordForm,
    params(("id" = Uuid, Path, description = "ID of the word")),
    responses(
        (status = 200, description = "Word updated", body = Word),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Word not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WordForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Word, WordCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Word::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Word::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/words/{id}/impact",
    description = "Number of example sentences deleted together with the word",
    params(("id" = Uuid, Path, description = "ID of the word")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Word not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Word, WordCreate>(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/words/{id}",
    description = "Deletes the word and its example sentences. Redirects to the word list of its language",
    params(("id" = Uuid, Path, description = "ID of the word")),
    responses(
        (status = 200, description = "Word deleted", body = DeletedResponse),
        (status = 404, description = "Word not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "words"
)]
pub(crate) async fn words_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Word, WordCreate>(&state, user, id).await?;
    let language_id = found.language_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Word::get_resource_type(), e))?;

    tracing::info!("word {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            Word::get_resource_type(),
            id,
            "language_id",
            language_id,
        )),
    ))
}
