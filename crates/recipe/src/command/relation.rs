use crate::{
    RecipeShort,
    relation::{FAVORITE, SHOPPING_CART},
};

impl super::Command {
    pub async fn favorite(&self, id: i64, user_id: i64) -> foodgram_shared::Result<RecipeShort> {
        let recipe = self.short_or_not_found(id).await?;
        FAVORITE.add(&self.write_db, user_id, id).await?;

        Ok(recipe)
    }

    pub async fn unfavorite(&self, id: i64, user_id: i64) -> foodgram_shared::Result<()> {
        self.short_or_not_found(id).await?;
        FAVORITE.remove(&self.write_db, user_id, id).await
    }

    pub async fn add_to_shopping_cart(
        &self,
        id: i64,
        user_id: i64,
    ) -> foodgram_shared::Result<RecipeShort> {
        let recipe = self.short_or_not_found(id).await?;
        SHOPPING_CART.add(&self.write_db, user_id, id).await?;

        Ok(recipe)
    }

    pub async fn remove_from_shopping_cart(
        &self,
        id: i64,
        user_id: i64,
    ) -> foodgram_shared::Result<()> {
        self.short_or_not_found(id).await?;
        SHOPPING_CART.remove(&self.write_db, user_id, id).await
    }

    async fn short_or_not_found(&self, id: i64) -> foodgram_shared::Result<RecipeShort> {
        let Some(recipe) = crate::Query(self.0.clone()).short(id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        Ok(recipe)
    }
}
