use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use validator::Validate;

use crate::repository;

#[derive(Validate, Deserialize)]
pub struct SetPasswordInput {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

impl super::Command {
    pub async fn set_password(
        &self,
        id: i64,
        input: SetPasswordInput,
    ) -> foodgram_shared::Result<()> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, repository::FindType::Id(id)).await?
        else {
            foodgram_shared::not_found!("user");
        };

        let argon2 = Argon2::default();
        let parsed_hash = PasswordHash::new(&user.password)?;

        if argon2
            .verify_password(input.current_password.as_bytes(), &parsed_hash)
            .is_err()
        {
            foodgram_shared::user!("Current password is incorrect");
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = argon2
            .hash_password(input.new_password.as_bytes(), &salt)?
            .to_string();

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: user.id,
                password: Some(password_hash),
                avatar: None,
            },
        )
        .await?;

        tracing::info!(user_id = user.id, "password changed");

        Ok(())
    }
}
