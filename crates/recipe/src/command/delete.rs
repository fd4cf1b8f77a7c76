use foodgram_db::table::Recipe;
use foodgram_shared::Error;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

impl super::Command {
    /// Removes the recipe; join rows go with it through cascading keys.
    pub async fn delete(&self, id: i64, user_id: i64) -> foodgram_shared::Result<()> {
        let mut tx = self.write_db.begin().await?;

        let Some(author_id) = super::find_author(&mut tx, id).await? else {
            foodgram_shared::not_found!("recipe");
        };

        if author_id != user_id {
            return Err(Error::Forbidden);
        }

        let statement = sea_query::Query::delete()
            .from_table(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = id, "recipe deleted");

        Ok(())
    }
}
