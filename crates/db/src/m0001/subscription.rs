use sea_query::{Index, IndexCreateStatement, IndexDropStatement, Table, TableDropStatement};

use crate::table::Subscription;

pub struct CreateTable;

fn drop_table() -> TableDropStatement {
    Table::drop().table(Subscription::Table).to_owned()
}

// Written by hand for the table-level CHECK constraint.
#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        sqlx::query(
            r#"CREATE TABLE "subscription" (
                "id" integer NOT NULL PRIMARY KEY AUTOINCREMENT,
                "user_id" integer NOT NULL,
                "subscribe_id" integer NOT NULL,
                "created_at" bigint NOT NULL,
                CONSTRAINT "uk_subscription_Mw4cYs" UNIQUE ("user_id", "subscribe_id"),
                CONSTRAINT "ck_subscription_no_self_Ze8hAq" CHECK ("user_id" <> "subscribe_id"),
                CONSTRAINT "fk_subscription_user_Op3kGt" FOREIGN KEY ("user_id") REFERENCES "user" ("id") ON DELETE CASCADE,
                CONSTRAINT "fk_subscription_subscribe_Bj6rNv" FOREIGN KEY ("subscribe_id") REFERENCES "user" ("id") ON DELETE CASCADE
            )"#,
        )
        .execute(connection)
        .await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}

pub struct CreateIdx1;

fn create_idx_1() -> IndexCreateStatement {
    Index::create()
        .name("idx_subscription_Ef2uSl")
        .table(Subscription::Table)
        .col(Subscription::SubscribeId)
        .to_owned()
}

fn drop_idx_1() -> IndexDropStatement {
    Index::drop()
        .name("idx_subscription_Ef2uSl")
        .table(Subscription::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateIdx1 {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_idx_1().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
