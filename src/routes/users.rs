use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use foodgram_recipe::AuthorView;
use foodgram_shared::{Page, PageArgs};
use foodgram_user::{AvatarInput, Profile, RegisterInput, SetPasswordInput};
use serde::{Deserialize, Serialize};

use super::{AppState, Payload, QueryParams};
use crate::{auth::AuthUser, error::AppResult};

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub recipes_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecipesLimit {
    pub recipes_limit: Option<usize>,
}

/// GET /api/users/
pub async fn list(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    QueryParams(args): QueryParams<PageArgs>,
) -> AppResult<Json<Page<Profile>>> {
    let viewer = auth.map(|a| a.user_id);

    Ok(Json(state.user_query.list(viewer, args).await?))
}

/// POST /api/users/
pub async fn register(
    State(state): State<AppState>,
    Payload(input): Payload<RegisterInput>,
) -> AppResult<(StatusCode, Json<RegisteredUser>)> {
    let id = state.user_command.register(input.clone()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id,
            email: input.email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
        }),
    ))
}

/// GET /api/users/me/
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Profile>> {
    let Some(profile) = state
        .user_query
        .find(auth.user_id, Some(auth.user_id))
        .await?
    else {
        foodgram_shared::not_found!("user");
    };

    Ok(Json(profile))
}

/// GET /api/users/{id}/
pub async fn detail(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<Profile>> {
    let viewer = auth.map(|a| a.user_id);
    let Some(profile) = state.user_query.find(id, viewer).await? else {
        foodgram_shared::not_found!("user");
    };

    Ok(Json(profile))
}

/// PUT /api/users/me/avatar/
pub async fn set_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(input): Payload<AvatarInput>,
) -> AppResult<Json<AvatarResponse>> {
    let avatar = state.user_command.set_avatar(auth.user_id, input).await?;

    Ok(Json(AvatarResponse { avatar }))
}

/// DELETE /api/users/me/avatar/
pub async fn clear_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    state.user_command.clear_avatar(auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/set_password/
pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(input): Payload<SetPasswordInput>,
) -> AppResult<StatusCode> {
    state.user_command.set_password(auth.user_id, input).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/subscriptions/
pub async fn subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(params): QueryParams<SubscriptionParams>,
) -> AppResult<Json<Page<AuthorView>>> {
    let args = PageArgs {
        page: params.page,
        limit: params.limit,
    };
    let page = state
        .recipe_query
        .subscriptions(auth.user_id, args, params.recipes_limit)
        .await?;

    Ok(Json(page))
}

/// POST /api/users/{id}/subscribe/
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    QueryParams(params): QueryParams<RecipesLimit>,
) -> AppResult<(StatusCode, Json<AuthorView>)> {
    state.user_command.subscribe(auth.user_id, id).await?;

    let Some(author) = state
        .recipe_query
        .author(id, Some(auth.user_id), params.recipes_limit)
        .await?
    else {
        foodgram_shared::not_found!("user");
    };

    Ok((StatusCode::CREATED, Json(author)))
}

/// DELETE /api/users/{id}/subscribe/
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.user_command.unsubscribe(auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
