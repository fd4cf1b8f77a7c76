use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use foodgram_shared::Error;

use crate::{error::AppError, routes::AppState};

const SCHEMES: [&str; 2] = ["Token ", "Bearer "];

/// The caller identified by the request's token.
///
/// Use `AuthUser` on endpoints that require authentication and
/// `Option<AuthUser>` where anonymous access is allowed. A malformed or
/// expired token is rejected with 401 in both cases.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

fn bearer(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;

    SCHEMES
        .iter()
        .find_map(|scheme| value.strip_prefix(scheme))
        .map(str::trim)
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if parts.headers.get(AUTHORIZATION).is_none() {
            return Ok(None);
        }

        let Some(token) = bearer(parts) else {
            tracing::warn!("unsupported authorization scheme");
            return Err(Error::Unauthorized.into());
        };

        let user_id = match crate::auth::validate_token(&state.config.jwt, token) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::warn!(error = %e, "invalid token");
                return Err(Error::Unauthorized.into());
            }
        };

        if state.user_query.find(user_id, None).await?.is_none() {
            tracing::warn!(user_id, "token for unknown user");
            return Err(Error::Unauthorized.into());
        }

        Ok(Some(AuthUser { user_id }))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(parts, state)
            .await?
            .ok_or(Error::Unauthorized.into())
    }
}
