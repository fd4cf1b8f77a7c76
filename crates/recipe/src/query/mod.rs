use std::ops::Deref;

use foodgram_db::table::Recipe;
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

mod author;
mod list;

pub use author::AuthorView;
pub use list::{RecipeFilter, RecipeIngredientView, RecipeView};

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Compact form returned by favorite and cart additions and in author listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl Query {
    pub async fn short(&self, id: i64) -> foodgram_shared::Result<Option<RecipeShort>> {
        let statement = sea_query::Query::select()
            .columns([Recipe::Id, Recipe::Name, Recipe::Image, Recipe::CookingTime])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RecipeShort, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    pub async fn exists(&self, id: i64) -> foodgram_shared::Result<bool> {
        Ok(self.short(id).await?.is_some())
    }
}
