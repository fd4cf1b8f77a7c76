#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use foodgram::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, ObservabilityConfig, ServerConfig},
};
use foodgram_recipe::NewIngredient;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

pub fn test_config(url: String) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            base_url: "https://foodgram.example".to_owned(),
        },
        database: DatabaseConfig {
            url,
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 7,
        },
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let url = format!("sqlite:{}", path.to_str().unwrap());

    let pool = foodgram::db::create_pool(&url, 1).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;
    drop(conn);

    let state = AppState::new(test_config(url), foodgram_shared::State::single(pool));
    state
        .recipe_command
        .import_ingredients(vec![
            NewIngredient {
                name: "flour".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            NewIngredient {
                name: "egg".to_owned(),
                measurement_unit: "pcs".to_owned(),
            },
            NewIngredient {
                name: "milk".to_owned(),
                measurement_unit: "ml".to_owned(),
            },
        ])
        .await?;

    Ok(TestApp {
        router: foodgram::router(state.clone()),
        state,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("DELETE", uri, token, None).await
    }

    /// Registers `name` and logs in, returning (user id, token).
    pub async fn signup(&self, name: &str) -> (i64, String) {
        let res = self
            .post(
                "/api/users/",
                None,
                json!({
                    "email": format!("{name}@foodgram.localhost"),
                    "username": name,
                    "first_name": name,
                    "last_name": "Doe",
                    "password": "my_password",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());
        let id = res.json()["id"].as_i64().unwrap();

        let res = self
            .post(
                "/api/auth/token/login/",
                None,
                json!({
                    "email": format!("{name}@foodgram.localhost"),
                    "password": "my_password",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text());
        let token = res.json()["auth_token"].as_str().unwrap().to_owned();

        (id, token)
    }

    pub async fn ingredient_id(&self, name: &str) -> i64 {
        let res = self
            .get(&format!("/api/ingredients/?name={name}"), None)
            .await;
        res.json()[0]["id"].as_i64().unwrap()
    }

    /// Creates a recipe through the API and returns its id.
    pub async fn create_recipe(&self, token: &str, name: &str, items: &[(&str, u32)]) -> i64 {
        let mut ingredients = Vec::new();
        for (ingredient, amount) in items {
            ingredients.push(json!({
                "id": self.ingredient_id(ingredient).await,
                "amount": amount,
            }));
        }

        let res = self
            .post(
                "/api/recipes/",
                Some(token),
                json!({
                    "name": name,
                    "text": format!("How to cook {name}"),
                    "image": "data:image/png;base64,iVBORw0KGgo=",
                    "cooking_time": 15,
                    "ingredients": ingredients,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text());

        res.json()["id"].as_i64().unwrap()
    }
}
