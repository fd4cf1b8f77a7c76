use foodgram_db::table::Subscription;
use foodgram_shared::{Error, relation::Relation};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;
use temp_dir::TempDir;

const SUBSCRIPTION: Relation<Subscription> = Relation {
    label: "subscription",
    table: Subscription::Table,
    actor: Subscription::UserId,
    target: Subscription::SubscribeId,
    created_at: Subscription::CreatedAt,
    allow_self: false,
};

async fn setup(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    for name in ["alice", "bob"] {
        sqlx::query(
            "INSERT INTO user (email, username, first_name, last_name, password, created_at) VALUES (?, ?, ?, ?, ?, 0)",
        )
        .bind(format!("{name}@example.com"))
        .bind(name)
        .bind(name)
        .bind(name)
        .bind("x")
        .execute(&pool)
        .await?;
    }

    Ok(pool)
}

#[tokio::test]
async fn add_twice_conflicts() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = setup(&dir).await?;

    SUBSCRIPTION.add(&pool, 1, 2).await?;
    assert!(SUBSCRIPTION.exists(&pool, 1, 2).await?);
    assert!(!SUBSCRIPTION.exists(&pool, 2, 1).await?);

    let err = SUBSCRIPTION.add(&pool, 1, 2).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(err.to_string(), "subscription already exists");

    Ok(())
}

#[tokio::test]
async fn remove_missing_is_not_found() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = setup(&dir).await?;

    let err = SUBSCRIPTION.remove(&pool, 1, 2).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    SUBSCRIPTION.add(&pool, 1, 2).await?;
    SUBSCRIPTION.remove(&pool, 1, 2).await?;
    assert!(!SUBSCRIPTION.exists(&pool, 1, 2).await?);

    Ok(())
}

#[tokio::test]
async fn self_reference_is_rejected_before_and_by_the_store() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = setup(&dir).await?;

    let err = SUBSCRIPTION.add(&pool, 1, 1).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let lenient = Relation {
        allow_self: true,
        ..SUBSCRIPTION
    };
    let err = lenient.add(&pool, 2, 2).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn targets_of_returns_only_related_ids() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = setup(&dir).await?;

    SUBSCRIPTION.add(&pool, 1, 2).await?;

    let targets = SUBSCRIPTION.targets_of(&pool, 1, &[1, 2, 3]).await?;
    assert_eq!(targets.len(), 1);
    assert!(targets.contains(&2));
    assert!(SUBSCRIPTION.targets_of(&pool, 1, &[]).await?.is_empty());

    Ok(())
}
