use foodgram_db::table::Recipe;
use sea_query::SqliteQueryBuilder;
use sea_query_sqlx::SqlxBinder;
use time::OffsetDateTime;
use validator::Validate;

use super::RecipeInput;

impl super::Command {
    pub async fn create(&self, author_id: i64, input: RecipeInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let statement = sea_query::Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::AuthorId,
                Recipe::Name,
                Recipe::Text,
                Recipe::CookingTime,
                Recipe::Image,
                Recipe::CreatedAt,
            ])
            .values_panic([
                author_id.into(),
                input.name.into(),
                input.text.into(),
                input.cooking_time.into(),
                input.image.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let mut tx = self.write_db.begin().await?;
        let id = match sqlx::query_with(&sql, values).execute(&mut *tx).await {
            Ok(result) => result.last_insert_rowid(),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                foodgram_shared::not_found!("user");
            }
            Err(e) => return Err(e.into()),
        };

        super::insert_ingredients(&mut tx, id, &input.ingredients).await?;
        tx.commit().await?;

        tracing::info!(recipe_id = id, author_id, "recipe created");

        Ok(id)
    }
}
