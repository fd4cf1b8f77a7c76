use axum::{
    Json,
    extract::{Path, State},
};
use foodgram_recipe::IngredientView;
use serde::Deserialize;

use super::{AppState, QueryParams};
use crate::error::AppResult;

#[derive(Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

/// GET /api/ingredients/?name=<prefix>
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Vec<IngredientView>>> {
    Ok(Json(
        state
            .recipe_query
            .ingredients(params.name.as_deref())
            .await?,
    ))
}

/// GET /api/ingredients/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<IngredientView>> {
    let Some(ingredient) = state.recipe_query.ingredient(id).await? else {
        foodgram_shared::not_found!("ingredient");
    };

    Ok(Json(ingredient))
}
