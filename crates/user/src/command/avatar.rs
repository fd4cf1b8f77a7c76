use serde::Deserialize;
use validator::Validate;

use crate::repository;

#[derive(Validate, Deserialize)]
pub struct AvatarInput {
    #[validate(length(min = 1))]
    pub avatar: String,
}

impl super::Command {
    pub async fn set_avatar(&self, id: i64, input: AvatarInput) -> foodgram_shared::Result<String> {
        input.validate()?;

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id,
                password: None,
                avatar: Some(Some(input.avatar.to_owned())),
            },
        )
        .await?;

        Ok(input.avatar)
    }

    pub async fn clear_avatar(&self, id: i64) -> foodgram_shared::Result<()> {
        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id,
                password: None,
                avatar: Some(None),
            },
        )
        .await
    }
}
