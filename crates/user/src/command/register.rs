use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::Validate;

use crate::repository;

static RE_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username pattern"));

/// Reserved because `/users/me/` addresses the current user.
const RESERVED_USERNAME: &str = "me";

#[derive(Clone, Validate, Deserialize)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 150), regex(path = *RE_USERNAME, message = "Only letters, digits and @/./+/-/_ are allowed."))]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        if input.username.eq_ignore_ascii_case(RESERVED_USERNAME) {
            foodgram_shared::user!("Username \"{RESERVED_USERNAME}\" is reserved");
        }

        if repository::is_email_exists(&self.read_db, &input.email).await? {
            foodgram_shared::user!("Email already exists");
        }

        if repository::is_username_exists(&self.read_db, &input.username).await? {
            foodgram_shared::user!("Username already used");
        }

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let id = match repository::create(
            &self.write_db,
            repository::CreateInput {
                email: input.email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password: password_hash,
            },
        )
        .await
        {
            Ok(id) => id,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                foodgram_shared::user!("Email or username already used");
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = id, "user registered");

        Ok(id)
    }
}
