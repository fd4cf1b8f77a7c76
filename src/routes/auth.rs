use axum::{Json, extract::State, http::StatusCode};
use foodgram_user::AuthenticateInput;
use serde::Serialize;

use super::{AppState, Payload};
use crate::{auth::AuthUser, error::AppResult};

#[derive(Serialize)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// POST /api/auth/token/login/
pub async fn login(
    State(state): State<AppState>,
    Payload(input): Payload<AuthenticateInput>,
) -> AppResult<Json<TokenResponse>> {
    let user_id = state.user_command.authenticate(input).await?;
    let auth_token = crate::auth::generate_token(&state.config.jwt, user_id)?;

    tracing::info!(user_id, "token issued");

    Ok(Json(TokenResponse { auth_token }))
}

/// POST /api/auth/token/logout/
///
/// Tokens are stateless and expire on their own; this only confirms the
/// caller was authenticated.
pub async fn logout(auth: AuthUser) -> StatusCode {
    tracing::info!(user_id = auth.user_id, "logout");

    StatusCode::NO_CONTENT
}
