use std::{collections::HashSet, ops::Deref};

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient};
use sea_query::{Expr, ExprTrait, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use validator::{Validate, ValidationError};

mod create;
mod delete;
mod relation;
mod update;

#[derive(Clone)]
pub struct Command(foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IngredientAmount {
    pub id: i64,
    #[validate(range(min = 1, message = "Amount must be at least 1"))]
    pub amount: u32,
}

/// Full recipe contents, used by both create and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecipeInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(min = 1))]
    pub text: String,
    #[validate(length(min = 1))]
    pub image: String,
    #[validate(range(min = 1, message = "Cooking time must be at least 1 minute"))]
    pub cooking_time: u32,
    #[validate(
        length(min = 1, message = "At least 1 ingredient is required"),
        custom(function = "validate_unique_ingredients"),
        nested
    )]
    pub ingredients: Vec<IngredientAmount>,
}

fn validate_unique_ingredients(ingredients: &[IngredientAmount]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    if ingredients.iter().all(|i| seen.insert(i.id)) {
        return Ok(());
    }

    let mut error = ValidationError::new("duplicate_ingredient");
    error.message = Some(std::borrow::Cow::from("Ingredients must not repeat"));
    Err(error)
}

/// Author of `id`, or `None` when the recipe does not exist.
pub(crate) async fn find_author(
    conn: &mut SqliteConnection,
    id: i64,
) -> foodgram_shared::Result<Option<i64>> {
    let statement = sea_query::Query::select()
        .column(Recipe::AuthorId)
        .from(Recipe::Table)
        .and_where(Expr::col(Recipe::Id).eq(id))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

async fn check_ingredients_exist(
    conn: &mut SqliteConnection,
    ingredients: &[IngredientAmount],
) -> foodgram_shared::Result<()> {
    let ids = ingredients.iter().map(|i| i.id).collect::<Vec<_>>();
    let statement = sea_query::Query::select()
        .column(Ingredient::Id)
        .from(Ingredient::Table)
        .and_where(Expr::col(Ingredient::Id).is_in(ids.iter().copied()))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let found = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
        .fetch_all(conn)
        .await?
        .into_iter()
        .collect::<HashSet<_>>();

    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        foodgram_shared::user!("Ingredient {missing} does not exist");
    }

    Ok(())
}

async fn insert_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: i64,
    ingredients: &[IngredientAmount],
) -> foodgram_shared::Result<()> {
    check_ingredients_exist(&mut *conn, ingredients).await?;

    let mut statement = sea_query::Query::insert()
        .into_table(RecipeIngredient::Table)
        .columns([
            RecipeIngredient::RecipeId,
            RecipeIngredient::IngredientId,
            RecipeIngredient::Amount,
        ])
        .to_owned();

    for ingredient in ingredients {
        statement.values_panic([
            recipe_id.into(),
            ingredient.id.into(),
            ingredient.amount.into(),
        ]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(conn).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ingredients: Vec<(i64, u32)>) -> RecipeInput {
        RecipeInput {
            name: "Pancakes".to_owned(),
            text: "Mix and fry.".to_owned(),
            image: "recipes/pancakes.png".to_owned(),
            cooking_time: 20,
            ingredients: ingredients
                .into_iter()
                .map(|(id, amount)| IngredientAmount { id, amount })
                .collect(),
        }
    }

    #[test]
    fn accepts_valid_recipe() {
        assert!(input(vec![(1, 200), (2, 2)]).validate().is_ok());
    }

    #[test]
    fn rejects_bad_ingredients() {
        assert!(input(vec![]).validate().is_err());
        assert!(input(vec![(1, 200), (1, 100)]).validate().is_err());
        assert!(input(vec![(1, 0)]).validate().is_err());
    }

    #[test]
    fn empty_ingredients_reported_on_field() {
        let errors = input(vec![]).validate().unwrap_err();

        assert!(errors.errors().contains_key("ingredients"));
    }

    #[test]
    fn rejects_bad_fields() {
        let mut recipe = input(vec![(1, 1)]);
        recipe.cooking_time = 0;
        assert!(recipe.validate().is_err());

        let mut recipe = input(vec![(1, 1)]);
        recipe.name = "x".repeat(257);
        assert!(recipe.validate().is_err());

        let mut recipe = input(vec![(1, 1)]);
        recipe.image = String::new();
        assert!(recipe.validate().is_err());
    }
}
