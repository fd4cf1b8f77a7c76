use std::str::FromStr;

use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;

async fn pool(dir: &TempDir) -> SqlitePool {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))
        .unwrap()
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePool::connect_with(opts).await.unwrap()
}

#[tokio::test]
async fn test_apply_all_creates_tables() {
    let dir = TempDir::new().unwrap();
    let pool = pool(&dir).await;
    let mut conn = pool.acquire().await.unwrap();

    foodgram_db::migrator()
        .unwrap()
        .run(&mut conn, &Plan::apply_all())
        .await
        .unwrap();

    // Applying again is a no-op.
    foodgram_db::migrator()
        .unwrap()
        .run(&mut conn, &Plan::apply_all())
        .await
        .unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' AND name NOT LIKE 'sqlite%' ORDER BY name",
    )
    .fetch_all(&mut *conn)
    .await
    .unwrap();

    for table in [
        "favorite_recipe",
        "ingredient",
        "recipe",
        "recipe_ingredient",
        "shopping_cart",
        "subscription",
        "user",
    ] {
        assert!(tables.iter().any(|t| t == table), "missing {table}");
    }
}

#[tokio::test]
async fn test_deleting_recipe_cascades_to_ingredients() {
    let dir = TempDir::new().unwrap();
    let pool = pool(&dir).await;
    let mut conn = pool.acquire().await.unwrap();

    foodgram_db::migrator()
        .unwrap()
        .run(&mut conn, &Plan::apply_all())
        .await
        .unwrap();

    for sql in [
        "INSERT INTO user (email, username, first_name, last_name, password, created_at) VALUES ('a@b.c', 'a', 'A', 'B', 'x', 0)",
        "INSERT INTO ingredient (name, search_name, measurement_unit) VALUES ('Flour', 'flour', 'g')",
        "INSERT INTO recipe (author_id, name, text, image, cooking_time, created_at) VALUES (1, 'r', 't', 'i', 1, 0)",
        "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (1, 1, 200)",
        "DELETE FROM recipe WHERE id = 1",
    ] {
        sqlx::query(sql).execute(&mut *conn).await.unwrap();
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe_ingredient")
        .fetch_one(&mut *conn)
        .await
        .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_amount_and_cooking_time_must_be_positive() {
    let dir = TempDir::new().unwrap();
    let pool = pool(&dir).await;
    let mut conn = pool.acquire().await.unwrap();

    foodgram_db::migrator()
        .unwrap()
        .run(&mut conn, &Plan::apply_all())
        .await
        .unwrap();

    for sql in [
        "INSERT INTO user (email, username, first_name, last_name, password, created_at) VALUES ('a@b.c', 'a', 'A', 'B', 'x', 0)",
        "INSERT INTO ingredient (name, search_name, measurement_unit) VALUES ('Flour', 'flour', 'g')",
        "INSERT INTO recipe (author_id, name, text, image, cooking_time, created_at) VALUES (1, 'r', 't', 'i', 1, 0)",
    ] {
        sqlx::query(sql).execute(&mut *conn).await.unwrap();
    }

    let result = sqlx::query(
        "INSERT INTO recipe (author_id, name, text, image, cooking_time, created_at) VALUES (1, 'r', 't', 'i', 0, 0)",
    )
    .execute(&mut *conn)
    .await;
    assert!(result.is_err());

    let result = sqlx::query(
        "INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (1, 1, 0)",
    )
    .execute(&mut *conn)
    .await;
    assert!(result.is_err());

    sqlx::query("INSERT INTO recipe_ingredient (recipe_id, ingredient_id, amount) VALUES (1, 1, 1)")
        .execute(&mut *conn)
        .await
        .unwrap();
}
