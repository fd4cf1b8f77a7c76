//! Unique (actor, target) join rows that are added and removed on request:
//! favorites, shopping cart entries and subscriptions all share this shape.
//!
//! `add` inserts without reading first and lets the table's unique key decide,
//! so two concurrent adds of the same pair cannot both succeed.

use std::collections::HashSet;

use sea_query::{Expr, ExprTrait, Iden, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::Error;

#[derive(Debug, Clone, Copy)]
pub struct Relation<T> {
    pub label: &'static str,
    pub table: T,
    pub actor: T,
    pub target: T,
    pub created_at: T,
    pub allow_self: bool,
}

impl<T> Relation<T>
where
    T: Iden + Copy + Send + Sync + 'static,
{
    pub async fn add(&self, db: &SqlitePool, actor: i64, target: i64) -> crate::Result<()> {
        if !self.allow_self && actor == target {
            crate::conflict!("{} to yourself is not allowed", self.label);
        }

        let statement = Query::insert()
            .into_table(self.table)
            .columns([self.actor, self.target, self.created_at])
            .values_panic([
                actor.into(),
                target.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(db).await {
            Ok(_) => {
                tracing::debug!(relation = self.label, actor, target, "relation added");

                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(Error::Conflict(format!("{} already exists", self.label)))
            }
            Err(sqlx::Error::Database(e)) if e.is_check_violation() => Err(Error::Conflict(
                format!("{} to yourself is not allowed", self.label),
            )),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(Error::NotFound(format!("{} target", self.label)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(&self, db: &SqlitePool, actor: i64, target: i64) -> crate::Result<()> {
        let statement = Query::delete()
            .from_table(self.table)
            .and_where(Expr::col(self.actor).eq(actor))
            .and_where(Expr::col(self.target).eq(target))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(db).await?;

        if result.rows_affected() == 0 {
            crate::not_found!("{}", self.label);
        }

        tracing::debug!(relation = self.label, actor, target, "relation removed");

        Ok(())
    }

    pub async fn exists(&self, db: &SqlitePool, actor: i64, target: i64) -> crate::Result<bool> {
        Ok(!self.targets_of(db, actor, &[target]).await?.is_empty())
    }

    /// Subset of `among` that `actor` is related to.
    pub async fn targets_of(
        &self,
        db: &SqlitePool,
        actor: i64,
        among: &[i64],
    ) -> crate::Result<HashSet<i64>> {
        if among.is_empty() {
            return Ok(HashSet::new());
        }

        let statement = Query::select()
            .column(self.target)
            .from(self.table)
            .and_where(Expr::col(self.actor).eq(actor))
            .and_where(Expr::col(self.target).is_in(among.iter().copied()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_all(db)
            .await?
            .into_iter()
            .collect())
    }
}
