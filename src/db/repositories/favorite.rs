use crate::db::format_timestamp;
use crate::entities::{favorite_teams, prelude::*};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

pub use crate::entities::favorite_teams::Model as FavoriteTeam;

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns `false` when the team was already a favorite.
    pub async fn add(
        &self,
        user_id: i64,
        team_id: i32,
        team_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let active_model = favorite_teams::ActiveModel {
            user_id: Set(user_id),
            team_id: Set(team_id),
            team_name: Set(team_name.to_string()),
            added_at: Set(format_timestamp(now)),
            ..Default::default()
        };

        let inserted = FavoriteTeams::insert(active_model)
            .on_conflict(
                OnConflict::columns([
                    favorite_teams::Column::UserId,
                    favorite_teams::Column::TeamId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to add favorite team")?;

        Ok(inserted > 0)
    }

    pub async fn remove(&self, user_id: i64, team_id: i32) -> Result<bool> {
        let result = FavoriteTeams::delete_many()
            .filter(favorite_teams::Column::UserId.eq(user_id))
            .filter(favorite_teams::Column::TeamId.eq(team_id))
            .exec(&self.conn)
            .await
            .context("Failed to remove favorite team")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<FavoriteTeam>> {
        FavoriteTeams::find()
            .filter(favorite_teams::Column::UserId.eq(user_id))
            .order_by_desc(favorite_teams::Column::AddedAt)
            .order_by_desc(favorite_teams::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list favorite teams")
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<u64> {
        FavoriteTeams::find()
            .filter(favorite_teams::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count favorite teams")
    }
}
