use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, PaginatableRepository, ResourceType, ResourceTyped,
        entity::{
            Achievement, AchievementCreate, CourseRecommendationRow, EarnedAchievementRow,
            Membership, MembershipCreate, MembershipPlan, MembershipPlanCreate, UserAchievement,
            UserAchievementCreate, UserEntity, UserEntityCreateUpdate, UserPreference,
            UserPreferenceUpdate, UserProgressRow, UserStreak, UserStreakUpdate,
        },
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::{
            cards::{ProgressCard, RecommendationCard},
            common::{DeletedResponse, ImpactResponse},
            users::{
                GrantAchievementBody, PreferencesForm, StartMembershipBody, StreakForm, UserForm,
            },
        },
        error::ErrorResponse,
        middlewares,
        routes::{ListQuery, find_or_not_found, impact_of},
    },
};

const RECOMMENDATION_COUNT: i64 = 3;

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(users_list_handler))
        .route(
            "/{id}",
            get(users_get_handler)
                .put(users_update_handler)
                .delete(users_delete_handler),
        )
        .route("/{id}/impact", get(users_impact_handler))
        .route(
            "/{id}/preferences",
            get(users_preferences_get_handler).put(users_preferences_put_handler),
        )
        .route(
            "/{id}/streak",
            get(users_streak_get_handler)
                .put(users_streak_put_handler)
                .delete(users_streak_reset_handler),
        )
        .route(
            "/{id}/achievements",
            get(users_achievements_list_handler).post(users_achievements_grant_handler),
        )
        .route(
            "/{id}/achievements/{achievement_id}",
            delete(users_achievements_revoke_handler),
        )
        .route(
            "/{id}/memberships",
            get(users_memberships_list_handler).post(users_memberships_start_handler),
        )
        .route("/{id}/progress", get(users_progress_handler))
        .route("/{id}/recommendations", get(users_recommendations_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

async fn find_user(state: &AppState, actor: &AuthenticatedUser, id: Uuid) -> WebResult<UserEntity> {
    find_or_not_found::<UserEntity, UserEntityCreateUpdate>(state, actor, id).await
}

#[utoipa::path(
    get,
    path = "/api/v1/users/",
    description = "Page of user profiles, newest first",
    params(ListQuery),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<UserEntity>),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let (limit, offset) = query.window(state.config());

    let users = UserEntity::page(state.pool(), user, None, limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(users)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "User found", body = UserEntity),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_user(&state, user, id).await?;

    Ok((StatusCode::OK, Json(found)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    request_body = UserForm,
    description = "Updates display name, avatar and role. The e-mail belongs to the auth provider and is kept",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "User updated successfully", body = UserEntity),
        (status = 400, description = "Form invalid", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_update_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_user(&state, user, id).await?;
    let data = payload
        .validate(&found)
        .map_err(|e| WebError::validation(UserEntity::get_resource_type(), e))?;

    if found.role() != data.role {
        tracing::info!("user {} role changed to {}", found.id(), data.role);
    }

    let updated = found
        .update(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(UserEntity::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(updated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/impact",
    description = "Earned achievements and memberships deleted together with the user",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Dependent records counted", body = ImpactResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_impact_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let found = find_user(&state, user, id).await?;
    let impact = impact_of(&state, user, id, &found).await?;

    Ok((StatusCode::OK, Json(impact)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    description = "Deletes the profile with its preferences, streak, achievements and memberships. \
        Admins cannot delete themselves",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "User deleted successfully", body = DeletedResponse),
        (status = 400, description = "Tried to delete own account", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    if user.user_id() == id {
        return Err(WebError::resource_bad_request(
            UserEntity::get_resource_type(),
            "you cannot delete your own account",
        ));
    }

    let found = find_user(&state, user, id).await?;
    found
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(UserEntity::get_resource_type(), e))?;

    tracing::info!("user {id} deleted by {}", user.user_id());
    Ok((
        StatusCode::OK,
        Json(DeletedResponse::to_collection(UserEntity::get_resource_type(), id)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/preferences",
    description = "Learning preferences; defaults when the user never saved any",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Preferences", body = UserPreference),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_preferences_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let preferences = UserPreference::find_or_default(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserPreference::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(preferences)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/preferences",
    request_body = PreferencesForm,
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Preferences saved", body = UserPreference),
        (status = 400, description = "Target language does not exist", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_preferences_put_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PreferencesForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let saved = UserPreference::upsert(state.pool(), user, id, UserPreferenceUpdate::from(payload))
        .await
        .map_err(|e| WebError::from_db(UserPreference::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(saved)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/streak",
    description = "Current and longest streak; zero when the user has no activity yet",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Streak", body = UserStreak),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_streak_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let streak = UserStreak::find_or_empty(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserStreak::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(streak)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/streak",
    request_body = StreakForm,
    description = "Overrides the streak. The longest streak is raised to at least the current one",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Streak saved", body = UserStreak),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_streak_put_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StreakForm>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let saved = UserStreak::upsert(state.pool(), user, id, UserStreakUpdate::from(payload))
        .await
        .map_err(|e| WebError::from_db(UserStreak::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(saved)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/streak",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Streak reset", body = UserStreak),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_streak_reset_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    UserStreak::reset(state.pool(), user, id)
        .await
        .map_err(|e| WebError::from_db(UserStreak::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(UserStreak::empty(id))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/achievements",
    description = "Achievements the user earned, most recent first",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Earned achievements", body = Vec<EarnedAchievementRow>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_achievements_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let earned = EarnedAchievementRow::fetch_for_user(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserAchievement::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(earned)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/achievements",
    request_body = GrantAchievementBody,
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 201, description = "Achievement granted", body = UserAchievement),
        (status = 404, description = "User or achievement not found", body = ErrorResponse),
        (status = 409, description = "Achievement already earned", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_achievements_grant_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GrantAchievementBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;
    find_or_not_found::<Achievement, AchievementCreate>(&state, user, payload.achievement_id)
        .await?;

    let data = UserAchievementCreate {
        user_id: id,
        achievement_id: payload.achievement_id,
    };
    // the (user_id, achievement_id) unique key turns a second grant into 409
    let granted = UserAchievement::create(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(UserAchievement::get_resource_type(), e))?;

    tracing::info!("achievement {} granted to {id}", granted.achievement_id());
    Ok((StatusCode::CREATED, Json(granted)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/achievements/{achievement_id}",
    params(
        ("id" = Uuid, Path, description = "ID of the user"),
        ("achievement_id" = Uuid, Path, description = "ID of the achievement to revoke"),
    ),
    responses(
        (status = 200, description = "Achievement revoked", body = DeletedResponse),
        (status = 404, description = "User has not earned this achievement", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_achievements_revoke_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((id, achievement_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let earned = UserAchievement::find_for_user(state.pool(), user, id, achievement_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserAchievement::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserAchievement::get_resource_type()))?;

    let earned_id = earned.id();
    earned
        .delete(state.pool(), user)
        .await
        .map_err(|e| WebError::from_db(UserAchievement::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(DeletedResponse::new(
            earned_id,
            format!("/api/v1/users/{id}/achievements"),
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/memberships",
    description = "Membership history of the user, most recent first",
    params(
        ("id" = Uuid, Path, description = "ID of the user"),
        ListQuery,
    ),
    responses(
        (status = 200, description = "Returns requested page", body = crate::model::Page<Membership>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_memberships_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;
    let (limit, offset) = query.window(state.config());

    let page = Membership::page(state.pool(), user, Some(id), limit, offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Membership::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/memberships",
    request_body = StartMembershipBody,
    description = "Starts an active membership lasting the plan's duration. Other active memberships of the user are cancelled",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 201, description = "Membership started", body = Membership),
        (status = 400, description = "Plan is not active or its duration is out of range", body = ErrorResponse),
        (status = 404, description = "User or plan not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_memberships_start_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StartMembershipBody>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;
    let plan = find_or_not_found::<MembershipPlan, MembershipPlanCreate>(&state, user, payload.plan_id)
        .await?;

    if !plan.is_active() {
        return Err(WebError::resource_bad_request(
            ResourceType::Membership,
            format!("plan `{}` is not active", plan.name()),
        ));
    }

    let data = MembershipCreate::starting(id, &plan, chrono::Utc::now()).ok_or_else(|| {
        WebError::resource_bad_request(
            ResourceType::Membership,
            format!("plan `{}` lasts too long to start", plan.name()),
        )
    })?;
    let started = Membership::start(state.pool(), user, data)
        .await
        .map_err(|e| WebError::from_db(Membership::get_resource_type(), e))?;

    tracing::info!("user {id} subscribed to `{}`", plan.name());
    Ok((StatusCode::CREATED, Json(started)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/progress",
    description = "Progress card: streaks, earned achievements and the current plan",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Progress card", body = ProgressCard),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_progress_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    let progress = UserProgressRow::fetch(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or_else(|| WebError::resource_not_found(UserEntity::get_resource_type()))?;

    Ok((StatusCode::OK, Json(ProgressCard::from(progress))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/recommendations",
    description = "Up to three published courses in the user's target language, or in any language without a preference",
    params(("id" = Uuid, Path, description = "ID of the user")),
    responses(
        (status = 200, description = "Recommended courses", body = Vec<RecommendationCard>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 401, description = "You're not authorized", body = ErrorResponse),
        (status = 403, description = "You're not an admin to do this", body = ErrorResponse),
    ),
    security(("cookie" = []), ("bearer" = [])),
    tag = "users"
)]
pub(crate) async fn users_recommendations_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.admin()?;
    find_user(&state, user, id).await?;

    let target = UserPreference::find_by_user(state.pool(), user, id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserPreference::get_resource_type(), e))?
        .and_then(|p| p.target_language_id());

    let rows = CourseRecommendationRow::fetch(state.pool(), user, target, RECOMMENDATION_COUNT)
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Course, e))?;

    let cards: Vec<_> = rows
        .into_iter()
        .map(|row| RecommendationCard::new(row, target.is_some()))
        .collect();

    Ok((StatusCode::OK, Json(cards)))
}
