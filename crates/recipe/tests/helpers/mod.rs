use std::{path::PathBuf, str::FromStr};

use foodgram_recipe::{IngredientAmount, NewIngredient, RecipeInput};
use foodgram_user::RegisterInput;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub struct TestState {
    pub state: foodgram_shared::State,
    pub cmd: foodgram_recipe::Command,
    pub query: foodgram_recipe::Query,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    let state = foodgram_shared::State::single(pool);
    let cmd = foodgram_recipe::Command::new(state.clone());
    cmd.import_ingredients(vec![
        ingredient("flour", "g"),
        ingredient("egg", "pcs"),
        ingredient("milk", "ml"),
        ingredient("sugar", "g"),
    ])
    .await?;

    Ok(TestState {
        query: foodgram_recipe::Query(state.clone()),
        cmd,
        state,
    })
}

pub fn ingredient(name: &str, unit: &str) -> NewIngredient {
    NewIngredient {
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

#[allow(dead_code)]
pub async fn create_user(state: &TestState, name: &str) -> anyhow::Result<i64> {
    Ok(foodgram_user::Command::new(state.state.clone())
        .register(RegisterInput {
            email: format!("{name}@foodgram.localhost"),
            username: name.to_owned(),
            first_name: name.to_owned(),
            last_name: "Doe".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?)
}

/// Looks up an ingredient imported by `setup_test_state` by name.
#[allow(dead_code)]
pub async fn ingredient_id(state: &TestState, name: &str) -> anyhow::Result<i64> {
    let found = state.query.ingredients(Some(name)).await?;
    Ok(found
        .into_iter()
        .find(|i| i.name == name)
        .map(|i| i.id)
        .unwrap())
}

#[allow(dead_code)]
pub fn recipe_input(name: &str, ingredients: Vec<(i64, u32)>) -> RecipeInput {
    RecipeInput {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        image: format!("recipes/{name}.png"),
        cooking_time: 15,
        ingredients: ingredients
            .into_iter()
            .map(|(id, amount)| IngredientAmount { id, amount })
            .collect(),
    }
}

#[allow(dead_code)]
pub async fn create_recipe(
    state: &TestState,
    author: i64,
    name: &str,
    ingredients: Vec<(&str, u32)>,
) -> anyhow::Result<i64> {
    let mut ids = vec![];
    for (ingredient, amount) in ingredients {
        ids.push((ingredient_id(state, ingredient).await?, amount));
    }

    Ok(state.cmd.create(author, recipe_input(name, ids)).await?)
}
