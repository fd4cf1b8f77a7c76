use axum::{
    Json,
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::IntoResponse,
};
use foodgram_recipe::{RecipeFilter, RecipeInput, RecipeShort, RecipeView, shopping};
use foodgram_shared::{Page, PageArgs};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::{AppState, Payload, QueryParams};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i64>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}

fn flag(name: &str, value: Option<&str>) -> AppResult<Option<bool>> {
    match value {
        None | Some("") => Ok(None),
        Some("1") | Some("true") => Ok(Some(true)),
        Some("0") | Some("false") => Ok(Some(false)),
        Some(other) => Err(AppError::BadRequest(format!(
            "Invalid value for {name}: {other}"
        ))),
    }
}

impl ListParams {
    fn filter(&self) -> AppResult<RecipeFilter> {
        Ok(RecipeFilter {
            author: self.author,
            is_favorited: flag("is_favorited", self.is_favorited.as_deref())?,
            is_in_shopping_cart: flag(
                "is_in_shopping_cart",
                self.is_in_shopping_cart.as_deref(),
            )?,
        })
    }

    fn page_args(&self) -> PageArgs {
        PageArgs {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// GET /api/recipes/
pub async fn list(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    QueryParams(params): QueryParams<ListParams>,
) -> AppResult<Json<Page<RecipeView>>> {
    let viewer = auth.map(|a| a.user_id);
    let page = state
        .recipe_query
        .list(params.filter()?, viewer, params.page_args())
        .await?;

    Ok(Json(page))
}

/// GET /api/recipes/{id}/
pub async fn detail(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<RecipeView>> {
    let viewer = auth.map(|a| a.user_id);
    let Some(recipe) = state.recipe_query.find(id, viewer).await? else {
        foodgram_shared::not_found!("recipe");
    };

    Ok(Json(recipe))
}

async fn view(state: &AppState, id: i64, viewer: i64) -> AppResult<RecipeView> {
    let Some(recipe) = state.recipe_query.find(id, Some(viewer)).await? else {
        foodgram_shared::not_found!("recipe");
    };

    Ok(recipe)
}

/// POST /api/recipes/
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Payload(input): Payload<RecipeInput>,
) -> AppResult<impl IntoResponse> {
    let id = state.recipe_command.create(auth.user_id, input).await?;
    let recipe = view(&state, id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PATCH /api/recipes/{id}/
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Payload(input): Payload<RecipeInput>,
) -> AppResult<Json<RecipeView>> {
    state.recipe_command.update(id, auth.user_id, input).await?;

    Ok(Json(view(&state, id, auth.user_id).await?))
}

/// DELETE /api/recipes/{id}/
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.recipe_command.delete(id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct ShortLink {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// GET /api/recipes/{id}/get-link/
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ShortLink>> {
    if !state.recipe_query.exists(id).await? {
        foodgram_shared::not_found!("recipe");
    }

    Ok(Json(ShortLink {
        short_link: state.config.short_link(id),
    }))
}

/// POST /api/recipes/{id}/favorite/
pub async fn favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    let recipe = state.recipe_command.favorite(id, auth.user_id).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// DELETE /api/recipes/{id}/favorite/
pub async fn unfavorite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.recipe_command.unfavorite(id, auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/recipes/{id}/shopping_cart/
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<RecipeShort>)> {
    let recipe = state
        .recipe_command
        .add_to_shopping_cart(id, auth.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

/// DELETE /api/recipes/{id}/shopping_cart/
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state
        .recipe_command
        .remove_from_shopping_cart(id, auth.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/recipes/download_shopping_cart/
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<impl IntoResponse> {
    let Some(user) = state.user_query.find(auth.user_id, None).await? else {
        foodgram_shared::not_found!("user");
    };

    let list = state.recipe_query.shopping_list(auth.user_id).await?;
    let body = list.render_text(&user.username, OffsetDateTime::now_utc().date());

    tracing::info!(
        user_id = auth.user_id,
        items = list.items.len(),
        "shopping list exported"
    );

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping::EXPORT_FILENAME),
            ),
        ],
        body,
    ))
}
