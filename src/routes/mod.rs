use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    routing::{get, post, put},
};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;

use crate::error::AppError;

mod auth;
mod health;
mod ingredients;
mod recipes;
mod short_link;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: foodgram_user::Command,
    pub user_query: foodgram_user::Query,
    pub recipe_command: foodgram_recipe::Command,
    pub recipe_query: foodgram_recipe::Query,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: foodgram_shared::State) -> Self {
        Self {
            config,
            user_command: foodgram_user::Command::new(state.clone()),
            user_query: foodgram_user::Query(state.clone()),
            recipe_command: foodgram_recipe::Command::new(state.clone()),
            recipe_query: foodgram_recipe::Query(state.clone()),
            pool: state.read_db,
        }
    }
}

/// JSON body whose parse errors are reported like every other API error.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// Query string whose parse errors are reported like every other API error.
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(QueryParams(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

fn api() -> Router<AppState> {
    Router::new()
        .route("/ingredients/", get(ingredients::list))
        .route("/ingredients/{id}/", get(ingredients::detail))
        .route("/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/download_shopping_cart/",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/recipes/{id}/",
            get(recipes::detail)
                .patch(recipes::update)
                .delete(recipes::delete),
        )
        .route("/recipes/{id}/get-link/", get(recipes::get_link))
        .route(
            "/recipes/{id}/favorite/",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/recipes/{id}/shopping_cart/",
            post(recipes::add_to_shopping_cart).delete(recipes::remove_from_shopping_cart),
        )
        .route("/users/", get(users::list).post(users::register))
        .route("/users/me/", get(users::me))
        .route(
            "/users/me/avatar/",
            put(users::set_avatar).delete(users::clear_avatar),
        )
        .route("/users/set_password/", post(users::set_password))
        .route("/users/subscriptions/", get(users::subscriptions))
        .route("/users/{id}/", get(users::detail))
        .route(
            "/users/{id}/subscribe/",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/auth/token/login/", post(auth::login))
        .route("/auth/token/logout/", post(auth::logout))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .nest("/api", api())
        .route("/s/{id}/", get(short_link::redirect))
        .with_state(app_state)
}
