use foodgram_db::table::Ingredient;
use sea_query::{Expr, ExprTrait, OnConflict, Order, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// Rows per insert statement, well under SQLite's bound parameter limit.
const IMPORT_CHUNK_SIZE: usize = 500;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

/// Catalogue entry as found in the bundled `ingredients.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl crate::Query {
    /// Ingredients whose name starts with `prefix`, ignoring case.
    pub async fn ingredients(
        &self,
        prefix: Option<&str>,
    ) -> foodgram_shared::Result<Vec<IngredientView>> {
        let mut statement = sea_query::Query::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .order_by(Ingredient::Name, Order::Asc)
            .order_by(Ingredient::MeasurementUnit, Order::Asc)
            .to_owned();

        if let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) {
            statement.and_where(Expr::cust_with_values(
                r"search_name LIKE ? ESCAPE '\'",
                [format!("{}%", escape_like(&prefix.to_lowercase()))],
            ));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn ingredient(&self, id: i64) -> foodgram_shared::Result<Option<IngredientView>> {
        let statement = sea_query::Query::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

impl crate::Command {
    /// Inserts catalogue entries, skipping (name, unit) pairs already present.
    /// Returns how many rows were added.
    pub async fn import_ingredients(
        &self,
        items: Vec<NewIngredient>,
    ) -> foodgram_shared::Result<u64> {
        let items = items
            .into_iter()
            .map(|item| NewIngredient {
                name: item.name.trim().to_owned(),
                measurement_unit: item.measurement_unit.trim().to_owned(),
            })
            .filter(|item| !item.name.is_empty() && !item.measurement_unit.is_empty())
            .collect::<Vec<_>>();

        let mut tx = self.write_db.begin().await?;
        let mut imported = 0;

        for chunk in items.chunks(IMPORT_CHUNK_SIZE) {
            let mut statement = sea_query::Query::insert()
                .into_table(Ingredient::Table)
                .columns([
                    Ingredient::Name,
                    Ingredient::SearchName,
                    Ingredient::MeasurementUnit,
                ])
                .on_conflict(
                    OnConflict::columns([Ingredient::Name, Ingredient::MeasurementUnit])
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            for item in chunk {
                statement.values_panic([
                    item.name.to_owned().into(),
                    item.name.to_lowercase().into(),
                    item.measurement_unit.to_owned().into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            imported += sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(imported, total = items.len(), "ingredients imported");

        Ok(imported)
    }
}
