//! Shopping list built from the recipes in a user's cart.

use std::collections::BTreeMap;

use foodgram_db::table::{Ingredient, Recipe, RecipeIngredient, ShoppingCart, User};
use sea_query::{Alias, Expr, ExprTrait, JoinType, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;
use time::{Date, macros::format_description};

pub const EXPORT_FILENAME: &str = "shopping_list.txt";

/// One ingredient line of one recipe in the cart.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartRecipe {
    pub name: String,
    pub author: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingItem>,
    pub recipes: Vec<CartRecipe>,
}

/// Sums amounts per (name, unit), sorted by name ignoring case, then unit.
pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Vec<ShoppingItem> {
    let mut totals: BTreeMap<(String, String, String), u64> = BTreeMap::new();

    for line in lines {
        let key = (line.name.to_lowercase(), line.name, line.measurement_unit);
        let total = totals.entry(key).or_default();
        *total = total.saturating_add(u64::try_from(line.amount).unwrap_or(0));
    }

    totals
        .into_iter()
        .map(|((_, name, measurement_unit), total)| ShoppingItem {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render_text(&self, username: &str, date: Date) -> String {
        let date = date
            .format(format_description!("[day].[month].[year]"))
            .unwrap_or_default();

        let products = self.items.iter().enumerate().map(|(index, item)| {
            format!(
                "{}. {} - {} {}",
                index + 1,
                capitalize(&item.name),
                item.total,
                item.measurement_unit
            )
        });

        let recipes = self
            .recipes
            .iter()
            .map(|recipe| format!("- {} (author: {})", recipe.name, recipe.author));

        [
            format!("Shopping list for {date}"),
            format!("User: {username}"),
            String::new(),
            "Products to buy:".to_owned(),
        ]
        .into_iter()
        .chain(products)
        .chain([String::new(), "Recipes:".to_owned()])
        .chain(recipes)
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl crate::Query {
    pub async fn shopping_list(&self, user_id: i64) -> foodgram_shared::Result<ShoppingList> {
        let statement = sea_query::Query::select()
            .column((Ingredient::Table, Ingredient::Name))
            .column((Ingredient::Table, Ingredient::MeasurementUnit))
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(ShoppingCart::Table)
            .join(
                JoinType::InnerJoin,
                RecipeIngredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .equals((ShoppingCart::Table, ShoppingCart::RecipeId)),
            )
            .join(
                JoinType::InnerJoin,
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(Expr::col((ShoppingCart::Table, ShoppingCart::UserId)).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let lines = sqlx::query_as_with::<_, CartLine, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let statement = sea_query::Query::select()
            .column((Recipe::Table, Recipe::Name))
            .expr_as(
                Expr::col((User::Table, User::Username)),
                Alias::new("author"),
            )
            .from(ShoppingCart::Table)
            .join(
                JoinType::InnerJoin,
                Recipe::Table,
                Expr::col((Recipe::Table, Recipe::Id))
                    .equals((ShoppingCart::Table, ShoppingCart::RecipeId)),
            )
            .join(
                JoinType::InnerJoin,
                User::Table,
                Expr::col((User::Table, User::Id)).equals((Recipe::Table, Recipe::AuthorId)),
            )
            .and_where(Expr::col((ShoppingCart::Table, ShoppingCart::UserId)).eq(user_id))
            .order_by((Recipe::Table, Recipe::Name), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let recipes = sqlx::query_as_with::<_, CartRecipe, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(ShoppingList {
            items: aggregate(lines),
            recipes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn line(name: &str, unit: &str, amount: i64) -> CartLine {
        CartLine {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[test]
    fn sums_each_ingredient_once() {
        let items = aggregate(vec![
            line("flour", "g", 200),
            line("egg", "pcs", 2),
            line("flour", "g", 100),
        ]);

        assert_eq!(
            items,
            vec![
                ShoppingItem {
                    name: "egg".to_owned(),
                    measurement_unit: "pcs".to_owned(),
                    total: 2,
                },
                ShoppingItem {
                    name: "flour".to_owned(),
                    measurement_unit: "g".to_owned(),
                    total: 300,
                },
            ]
        );
    }

    #[test]
    fn same_name_different_unit_stays_apart() {
        let items = aggregate(vec![line("milk", "ml", 200), line("milk", "cup", 1)]);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].measurement_unit, "cup");
        assert_eq!(items[1].measurement_unit, "ml");
    }

    #[test]
    fn totals_do_not_overflow_i32() {
        let items = aggregate(vec![
            line("salt", "g", i32::MAX as i64),
            line("salt", "g", i32::MAX as i64),
        ]);

        assert_eq!(items[0].total, 2 * i32::MAX as u64);
    }

    #[test]
    fn sorts_names_ignoring_case() {
        let items = aggregate(vec![
            line("Zucchini", "g", 100),
            line("apple", "pcs", 2),
            line("Banana", "pcs", 3),
        ]);

        let names = items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["apple", "Banana", "Zucchini"]);
    }

    #[test]
    fn negative_amount_counts_as_zero() {
        let items = aggregate(vec![line("salt", "g", -5), line("salt", "g", 3)]);

        assert_eq!(items[0].total, 3);
    }

    #[test]
    fn empty_cart_is_empty_list() {
        assert!(aggregate(vec![]).is_empty());
    }

    #[test]
    fn render_text_export() {
        let list = ShoppingList {
            items: aggregate(vec![line("flour", "g", 300), line("egg", "pcs", 2)]),
            recipes: vec![CartRecipe {
                name: "Pancakes".to_owned(),
                author: "anna".to_owned(),
            }],
        };

        assert_eq!(
            list.render_text("john", date!(2024 - 03 - 07)),
            "Shopping list for 07.03.2024\n\
             User: john\n\
             \n\
             Products to buy:\n\
             1. Egg - 2 pcs\n\
             2. Flour - 300 g\n\
             \n\
             Recipes:\n\
             - Pancakes (author: anna)"
        );
    }
}
