use std::collections::HashMap;

use foodgram_db::table::{FavoriteRecipe, Ingredient, Recipe, RecipeIngredient, ShoppingCart};
use foodgram_shared::{Page, PageArgs};
use foodgram_user::Profile;
use sea_query::{Expr, ExprTrait, Func, JoinType, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use crate::relation::{FAVORITE, SHOPPING_CART};

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct RecipeFilter {
    pub author: Option<i64>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RecipeIngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeView {
    pub id: i64,
    pub author: Profile,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

#[derive(FromRow)]
struct RecipeRow {
    id: i64,
    author_id: i64,
    name: String,
    image: String,
    text: String,
    cooking_time: i64,
}

#[derive(FromRow)]
struct IngredientRow {
    recipe_id: i64,
    id: i64,
    name: String,
    measurement_unit: String,
    amount: i64,
}

fn membership(
    statement: &mut SelectStatement,
    wanted: bool,
    table: impl sea_query::IntoTableRef,
    user_col: impl sea_query::IntoColumnRef,
    recipe_col: impl sea_query::IntoColumnRef,
    viewer: i64,
) {
    let subquery = sea_query::Query::select()
        .column(recipe_col)
        .from(table)
        .and_where(Expr::col(user_col).eq(viewer))
        .to_owned();

    let id = Expr::col((Recipe::Table, Recipe::Id));
    statement.and_where(if wanted {
        id.in_subquery(subquery)
    } else {
        id.not_in_subquery(subquery)
    });
}

fn filtered(filter: RecipeFilter, viewer: Option<i64>) -> SelectStatement {
    let mut statement = sea_query::Query::select().from(Recipe::Table).to_owned();

    if let Some(author) = filter.author {
        statement.and_where(Expr::col((Recipe::Table, Recipe::AuthorId)).eq(author));
    }

    // Membership filters only make sense for a known viewer.
    let Some(viewer) = viewer else {
        return statement;
    };

    if let Some(wanted) = filter.is_favorited {
        membership(
            &mut statement,
            wanted,
            FavoriteRecipe::Table,
            FavoriteRecipe::UserId,
            FavoriteRecipe::RecipeId,
            viewer,
        );
    }

    if let Some(wanted) = filter.is_in_shopping_cart {
        membership(
            &mut statement,
            wanted,
            ShoppingCart::Table,
            ShoppingCart::UserId,
            ShoppingCart::RecipeId,
            viewer,
        );
    }

    statement
}

fn with_recipe_columns(statement: &mut SelectStatement) -> &mut SelectStatement {
    statement.columns([
        (Recipe::Table, Recipe::Id),
        (Recipe::Table, Recipe::AuthorId),
        (Recipe::Table, Recipe::Name),
        (Recipe::Table, Recipe::Image),
        (Recipe::Table, Recipe::Text),
        (Recipe::Table, Recipe::CookingTime),
    ])
}

impl super::Query {
    /// Recipes ordered by name then id, both descending.
    pub async fn list(
        &self,
        filter: RecipeFilter,
        viewer: Option<i64>,
        args: PageArgs,
    ) -> foodgram_shared::Result<Page<RecipeView>> {
        let base = filtered(filter, viewer);

        let mut statement = base.clone();
        with_recipe_columns(&mut statement)
            .order_by((Recipe::Table, Recipe::Name), Order::Desc)
            .order_by((Recipe::Table, Recipe::Id), Order::Desc)
            .limit(args.limit())
            .offset(args.offset());

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut count = base;
        count.expr(Func::count(Expr::col((Recipe::Table, Recipe::Id))));

        let (sql, values) = count.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        Ok(Page {
            count: u64::try_from(count).unwrap_or(0),
            results: self.assemble(rows, viewer).await?,
        })
    }

    pub async fn find(
        &self,
        id: i64,
        viewer: Option<i64>,
    ) -> foodgram_shared::Result<Option<RecipeView>> {
        let mut statement = sea_query::Query::select().from(Recipe::Table).to_owned();
        with_recipe_columns(&mut statement)
            .and_where(Expr::col((Recipe::Table, Recipe::Id)).eq(id))
            .limit(1);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
            .into_iter()
            .collect();

        Ok(self.assemble(rows, viewer).await?.into_iter().next())
    }

    async fn assemble(
        &self,
        rows: Vec<RecipeRow>,
        viewer: Option<i64>,
    ) -> foodgram_shared::Result<Vec<RecipeView>> {
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids = rows.iter().map(|r| r.id).collect::<Vec<_>>();
        let author_ids = rows.iter().map(|r| r.author_id).collect::<Vec<_>>();

        let mut ingredients = self.ingredients_of(&ids).await?;
        let authors = foodgram_user::Query(self.0.clone())
            .find_many(&author_ids, viewer)
            .await?;

        let (favorites, cart) = match viewer {
            Some(viewer) => (
                FAVORITE.targets_of(&self.read_db, viewer, &ids).await?,
                SHOPPING_CART.targets_of(&self.read_db, viewer, &ids).await?,
            ),
            None => Default::default(),
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(author) = authors.get(&row.author_id) else {
                foodgram_shared::not_found!("user");
            };

            views.push(RecipeView {
                id: row.id,
                author: author.clone(),
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                is_favorited: favorites.contains(&row.id),
                is_in_shopping_cart: cart.contains(&row.id),
                name: row.name,
                image: row.image,
                text: row.text,
                cooking_time: row.cooking_time,
            });
        }

        Ok(views)
    }

    async fn ingredients_of(
        &self,
        ids: &[i64],
    ) -> foodgram_shared::Result<HashMap<i64, Vec<RecipeIngredientView>>> {
        let statement = sea_query::Query::select()
            .column((RecipeIngredient::Table, RecipeIngredient::RecipeId))
            .column((Ingredient::Table, Ingredient::Id))
            .column((Ingredient::Table, Ingredient::Name))
            .column((Ingredient::Table, Ingredient::MeasurementUnit))
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(RecipeIngredient::Table)
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::IngredientId))
                    .equals((Ingredient::Table, Ingredient::Id)),
            )
            .and_where(
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .is_in(ids.iter().copied()),
            )
            .order_by((Ingredient::Table, Ingredient::Name), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, IngredientRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut by_recipe: HashMap<i64, Vec<RecipeIngredientView>> = HashMap::new();
        for row in rows {
            by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(RecipeIngredientView {
                    id: row.id,
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: row.amount,
                });
        }

        Ok(by_recipe)
    }
}
