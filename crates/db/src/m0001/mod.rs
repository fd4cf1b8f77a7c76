mod favorite_recipe;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod shopping_cart;
mod subscription;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "foodgram",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        ingredient::CreateTable,
        ingredient::CreateUk1,
        ingredient::CreateIdx1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe_ingredient::CreateTable,
        recipe_ingredient::CreateIdx1,
        favorite_recipe::CreateTable,
        favorite_recipe::CreateIdx1,
        shopping_cart::CreateTable,
        shopping_cart::CreateIdx1,
        subscription::CreateTable,
        subscription::CreateIdx1
    ]
);
