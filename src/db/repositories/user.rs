use crate::db::format_timestamp;
use crate::entities::{prelude::*, users};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

pub use crate::entities::users::Model as UserRecord;

/// Identity fields captured on first contact.
#[derive(Debug, Clone, Default)]
pub struct NewUser<'a> {
    pub username: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts the user unless a record already exists. Returns whether a row
    /// was written.
    pub async fn insert_if_absent(
        &self,
        user_id: i64,
        identity: &NewUser<'_>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let now = format_timestamp(now);
        let active_model = users::ActiveModel {
            user_id: Set(user_id),
            username: Set(identity.username.map(str::to_string)),
            first_name: Set(identity.first_name.map(str::to_string)),
            last_name: Set(identity.last_name.map(str::to_string)),
            preferred_league: Set(None),
            favorite_team: Set(None),
            notifications_enabled: Set(false),
            message_count: Set(0),
            created_at: Set(now.clone()),
            last_activity: Set(now),
        };

        let inserted = Users::insert(active_model)
            .on_conflict(
                OnConflict::column(users::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to register user")?;

        Ok(inserted > 0)
    }

    /// Refreshes `last_activity` and bumps `message_count`. Unknown users
    /// affect zero rows.
    pub async fn touch(&self, user_id: i64, now: DateTime<Utc>) -> Result<u64> {
        let result = Users::update_many()
            .col_expr(
                users::Column::LastActivity,
                Expr::value(format_timestamp(now)),
            )
            .col_expr(
                users::Column::MessageCount,
                Expr::col(users::Column::MessageCount).add(1),
            )
            .filter(users::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to update user activity")?;

        Ok(result.rows_affected)
    }

    /// Writes a single column of the user's record.
    pub async fn set_column(
        &self,
        user_id: i64,
        column: users::Column,
        value: SimpleExpr,
    ) -> Result<u64> {
        let result = Users::update_many()
            .col_expr(column, value)
            .filter(users::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to update user preference")?;

        Ok(result.rows_affected)
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<UserRecord>> {
        Users::find_by_id(user_id)
            .one(&self.conn)
            .await
            .context("Failed to query user")
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}
