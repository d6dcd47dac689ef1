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
        entity::{Sentence, SentenceCreate},
    },
    web::{
        AppState, RequestContext, WebError, WebResult,
        dto::{
            common::{DeletedResponse, ImpactResponse},
            words::SentenceForm,
        },
        error::ErrorResponse,
        middlewares,
        routes::{find_or_not_found, page_window},
    },
};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SentenceListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only the sentences of this word
    pub word_id: Option<Uuid>,
}

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(sentences_list_handler).post(sentences_create_handler))
        .route(
            "/{id}",
            get(sentences_get_handler)
                .put(sentences_update_handler)
                .delete(sentences_delete_handler),
        )
        .route("/{id}/impact", get(sentences_impact_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/sentences/",
    description = "Page of example sentences, optionally only those of one word",
    params(SentenceListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Sentence>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<SentenceListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = page_window(
        query.limit,
        query.offset,
        state.config().app().page_limit(),
    );

    let page = Sentence::page(state.pool(), user, query.word_id, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Sentence::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sentences/{id}",
    params(("id" = Uuid, Path, description = "ID of the sentence")),
    responses(
        (status = 200, description = "Sentence found", body = Sentence),
        (status = 404, description = "Sentence not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Sentence, SentenceCreate>(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    post,
    path = "/api/v1/sentences/",
    request_body = SentenceForm,
    description = "Adds an example sentence to a word",
    responses(
        (status = 201, description = "Sentence created", body = Sentence),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_create_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(payload): Json<SentenceForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Sentence::get_resource_type(), e))?;

    let created = Sentence::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Sentence::get_resource_type(), e))?;

    tracing::debug!("sentence {} created", created.id());
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/v1/sentences/{id}",
    request_body = SentenceForm,
    params(("id" = Uuid, Path, description = "ID of the sentence")),
    responses(
        (status = 200, description = "Sentence updated", body = Sentence),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "Sentence not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SentenceForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Sentence, SentenceCreate>(&state, user, id).await?;
    let data = payload
        .validate()
        .map_err(|e| WebError::validation(Sentence::get_resource_type(), e))?;

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Sentence::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sentences/{id}/impact",
    description = "Delete confirmation. Sentences have no dependent records",
    params(("id" = Uuid, Path, description = "ID of the sentence")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "Sentence not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_or_not_found::<Sentence, SentenceCreate>(&state, user, id).await?;
    let impact = ImpactResponse::new(Sentence::get_resource_type(), id, vec![]);

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sentences/{id}",
    description = "Deletes the sentence. Redirects to the sentence list of its word",
    params(("id" = Uuid, Path, description = "ID of the sentence")),
    responses(
        (status = 200, description = "Sentence deleted", body = DeletedResponse),
        (status = 404, description = "Sentence not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "sentences"
)]
pub(crate) async fn sentences_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_or_not_found::<Sentence, SentenceCreate>(&state, user, id).await?;
    let word_id = found.word_id();

    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(Sentence::get_resource_type(), e))?;

    tracing::info!("sentence {id} deleted");
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_parent(
            Sentence::get_resource_type(),
            id,
            "word_id",
            word_id,
        )),
    ))
}
