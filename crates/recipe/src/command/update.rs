use foodgram_db::table::{Recipe, RecipeIngredient};
use foodgram_shared::Error;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use validator::Validate;

use super::RecipeInput;

impl super::Command {
    /// Replaces every field and the whole ingredient list. Author only.
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<()> {
        input.validate()?;

        let mut tx = self.write_db.begin().await?;

        let Some(author_id) = super::find_author(&mut tx, id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        if author_id != user_id {
            return Err(Error::Forbidden);
        }

        let statement = sea_query::Query::update()
            .table(Recipe::Table)
            .values([
                (Recipe::Name, input.name.into()),
                (Recipe::Text, input.text.into()),
                (Recipe::CookingTime, input.cooking_time.into()),
                (Recipe::Image, input.image.into()),
            ])
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        let statement = sea_query::Query::delete()
            .from_table(RecipeIngredient::Table)
            .and_where(Expr::col(RecipeIngredient::RecipeId).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        super::insert_ingredients(&mut tx, id, &input.ingredients).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe updated");

        Ok(())
    }
}
