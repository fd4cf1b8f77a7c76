use std::collections::HashMap;

use foodgram_db::table::Recipe;
use foodgram_shared::{Page, PageArgs};
use foodgram_user::Profile;
use sea_query::{Expr, ExprTrait, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use super::RecipeShort;

/// A followed author with their recipes, as listed under subscriptions.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub profile: Profile,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: u64,
}

#[derive(FromRow)]
struct AuthorRecipeRow {
    author_id: i64,
    #[sqlx(flatten)]
    recipe: RecipeShort,
}

impl super::Query {
    /// Authors `user_id` follows, each with at most `recipes_limit` recipes.
    pub async fn subscriptions(
        &self,
        user_id: i64,
        args: PageArgs,
        recipes_limit: Option<usize>,
    ) -> foodgram_shared::Result<Page<AuthorView>> {
        let page = foodgram_user::Query(self.0.clone())
            .subscriptions(user_id, args)
            .await?;

        let ids = page.results.iter().map(|p| p.id).collect::<Vec<_>>();
        let mut recipes = self.recipes_by_authors(&ids).await?;

        Ok(page.map(|profile| {
            let recipes = recipes.remove(&profile.id).unwrap_or_default();
            author_view(profile, recipes, recipes_limit)
        }))
    }

    pub async fn author(
        &self,
        id: i64,
        viewer: Option<i64>,
        recipes_limit: Option<usize>,
    ) -> foodgram_shared::Result<Option<AuthorView>> {
        let Some(profile) = foodgram_user::Query(self.0.clone())
            .find(id, viewer)
            .await?
        else {
            return Ok(None);
        };

        let recipes = self
            .recipes_by_authors(&[id])
            .await?
            .remove(&id)
            .unwrap_or_default();

        Ok(Some(author_view(profile, recipes, recipes_limit)))
    }

    async fn recipes_by_authors(
        &self,
        ids: &[i64],
    ) -> foodgram_shared::Result<HashMap<i64, Vec<RecipeShort>>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = sea_query::Query::select()
            .columns([
                Recipe::AuthorId,
                Recipe::Id,
                Recipe::Name,
                Recipe::Image,
                Recipe::CookingTime,
            ])
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::AuthorId).is_in(ids.iter().copied()))
            .order_by(Recipe::CreatedAt, Order::Desc)
            .order_by(Recipe::Id, Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, AuthorRecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut by_author: HashMap<i64, Vec<RecipeShort>> = HashMap::new();
        for row in rows {
            by_author.entry(row.author_id).or_default().push(row.recipe);
        }

        Ok(by_author)
    }
}

fn author_view(
    profile: Profile,
    mut recipes: Vec<RecipeShort>,
    recipes_limit: Option<usize>,
) -> AuthorView {
    let recipes_count = recipes.len() as u64;
    if let Some(limit) = recipes_limit {
        recipes.truncate(limit);
    }

    AuthorView {
        profile,
        recipes,
        recipes_count,
    }
}
