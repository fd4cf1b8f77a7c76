use axum::{
    extract::{Path, State},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};

use super::AppState;
use crate::error::AppResult;

/// GET /s/{id}/ - 302 to the recipe it points at
pub async fn redirect(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    if !state.recipe_query.exists(id).await? {
        foodgram_shared::not_found!("recipe");
    }

    Ok((StatusCode::FOUND, [(LOCATION, format!("/api/recipes/{id}/"))]))
}
