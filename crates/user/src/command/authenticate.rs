use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::Deserialize;
use validator::Validate;

use crate::repository;

#[derive(Validate, Deserialize)]
pub struct AuthenticateInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl super::Command {
    /// Checks the credentials and returns the user id they belong to.
    pub async fn authenticate(&self, input: AuthenticateInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let Some(user) =
            repository::find(&self.read_db, repository::FindType::Email(input.email)).await?
        else {
            foodgram_shared::user!("Invalid email or password. Please try again.");
        };

        let parsed_hash = PasswordHash::new(&user.password)?;

        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::debug!(user_id = user.id, "password mismatch");
            foodgram_shared::user!("Invalid email or password. Please try again.");
        }

        Ok(user.id)
    }
}
