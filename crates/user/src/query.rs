use std::{collections::HashMap, ops::Deref};

use foodgram_db::table::{Subscription, User};
use foodgram_shared::{Page, PageArgs};
use sea_query::{Expr, ExprTrait, Func, JoinType, Order, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::subscription::SUBSCRIPTION;

/// Public view of a user as seen by `viewer`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    #[sqlx(skip)]
    pub is_subscribed: bool,
}

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn select_profile() -> SelectStatement {
    sea_query::Query::select()
        .columns([
            (User::Table, User::Id),
            (User::Table, User::Email),
            (User::Table, User::Username),
            (User::Table, User::FirstName),
            (User::Table, User::LastName),
            (User::Table, User::Avatar),
        ])
        .from(User::Table)
        .to_owned()
}

impl Query {
    pub async fn find(&self, id: i64, viewer: Option<i64>) -> foodgram_shared::Result<Option<Profile>> {
        let statement = select_profile()
            .and_where(Expr::col((User::Table, User::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(mut profile) = sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Ok(None);
        };

        if let Some(viewer) = viewer {
            profile.is_subscribed = SUBSCRIPTION.exists(&self.read_db, viewer, id).await?;
        }

        Ok(Some(profile))
    }

    pub async fn list(
        &self,
        viewer: Option<i64>,
        args: PageArgs,
    ) -> foodgram_shared::Result<Page<Profile>> {
        let statement = select_profile()
            .order_by((User::Table, User::Id), Order::Asc)
            .limit(args.limit())
            .offset(args.offset())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let results = sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let count = sea_query::Query::select()
            .expr(Func::count(Expr::col(User::Id)))
            .from(User::Table)
            .to_owned();

        Ok(Page {
            count: self.count(count).await?,
            results: self.mark_subscribed(viewer, results).await?,
        })
    }

    /// Profiles keyed by id; unknown ids are skipped.
    pub async fn find_many(
        &self,
        ids: &[i64],
        viewer: Option<i64>,
    ) -> foodgram_shared::Result<HashMap<i64, Profile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = select_profile()
            .and_where(Expr::col((User::Table, User::Id)).is_in(ids.iter().copied()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let profiles = sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(self
            .mark_subscribed(viewer, profiles)
            .await?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect())
    }

    /// Users `id` is subscribed to, ordered by username.
    pub async fn subscriptions(
        &self,
        id: i64,
        args: PageArgs,
    ) -> foodgram_shared::Result<Page<Profile>> {
        let statement = select_profile()
            .join(
                JoinType::InnerJoin,
                Subscription::Table,
                Expr::col((Subscription::Table, Subscription::SubscribeId))
                    .equals((User::Table, User::Id)),
            )
            .and_where(Expr::col((Subscription::Table, Subscription::UserId)).eq(id))
            .order_by((User::Table, User::Username), Order::Asc)
            .limit(args.limit())
            .offset(args.offset())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let results = sqlx::query_as_with::<_, Profile, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?
            .into_iter()
            .map(|profile| Profile {
                is_subscribed: true,
                ..profile
            })
            .collect();

        let count = sea_query::Query::select()
            .expr(Func::count(Expr::col(Subscription::Id)))
            .from(Subscription::Table)
            .and_where(Expr::col(Subscription::UserId).eq(id))
            .to_owned();

        Ok(Page {
            count: self.count(count).await?,
            results,
        })
    }

    async fn count(&self, statement: SelectStatement) -> foodgram_shared::Result<u64> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.read_db)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn mark_subscribed(
        &self,
        viewer: Option<i64>,
        mut profiles: Vec<Profile>,
    ) -> foodgram_shared::Result<Vec<Profile>> {
        let Some(viewer) = viewer else {
            return Ok(profiles);
        };

        let ids = profiles.iter().map(|p| p.id).collect::<Vec<_>>();
        let subscribed = SUBSCRIPTION.targets_of(&self.read_db, viewer, &ids).await?;

        for profile in profiles.iter_mut() {
            profile.is_subscribed = subscribed.contains(&profile.id);
        }

        Ok(profiles)
    }
}
