use foodgram_db::table::User;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub password: String,
}

pub enum FindType {
    Id(i64),
    Email(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> foodgram_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([User::Id, User::Password])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => {
            statement.and_where(Expr::cust_with_values("email = ? COLLATE NOCASE", [email]))
        }
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) struct CreateInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> sqlx::Result<i64> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Email,
            User::Username,
            User::FirstName,
            User::LastName,
            User::Password,
            User::CreatedAt,
        ])
        .values_panic([
            input.email.into(),
            input.username.into(),
            input.first_name.into(),
            input.last_name.into(),
            input.password.into(),
            now.into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.last_insert_rowid())
}

pub(crate) struct UpdateInput {
    pub id: i64,
    pub password: Option<String>,
    pub avatar: Option<Option<String>>,
}

pub(crate) async fn update(pool: &SqlitePool, input: UpdateInput) -> foodgram_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(password) = input.password {
        statement.value(User::Password, password);
    }

    if let Some(avatar) = input.avatar {
        statement.value(User::Avatar, avatar);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    if result.rows_affected() == 0 {
        foodgram_shared::not_found!("user");
    }

    Ok(())
}

pub(crate) async fn exists(pool: &SqlitePool, id: i64) -> foodgram_shared::Result<bool> {
    Ok(find(pool, FindType::Id(id)).await?.is_some())
}

pub(crate) async fn is_email_exists(
    pool: &SqlitePool,
    email: impl Into<String>,
) -> foodgram_shared::Result<bool> {
    Ok(find(pool, FindType::Email(email.into())).await?.is_some())
}

pub(crate) async fn is_username_exists(
    pool: &SqlitePool,
    username: impl Into<String>,
) -> foodgram_shared::Result<bool> {
    let statement = Query::select()
        .column(User::Id)
        .from(User::Table)
        .and_where(Expr::cust_with_values(
            "username = ? COLLATE NOCASE",
            [username.into()],
        ))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let row = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}
