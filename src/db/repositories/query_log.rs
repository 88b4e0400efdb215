use crate::db::format_timestamp;
use crate::entities::{prelude::*, query_history};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub use crate::entities::query_history::Model as QueryLogEntry;

pub struct QueryLogRepository {
    conn: DatabaseConnection,
}

impl QueryLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn append(
        &self,
        user_id: i64,
        query_type: &str,
        parameter: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let active_model = query_history::ActiveModel {
            user_id: Set(user_id),
            query_type: Set(query_type.to_string()),
            parameter: Set(parameter.map(std::string::ToString::to_string)),
            created_at: Set(format_timestamp(at)),
            ..Default::default()
        };

        QueryHistory::insert(active_model)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to append query log entry")?;

        Ok(())
    }

    /// Newest first. Entries written within the same microsecond fall back to
    /// insertion order.
    pub async fn recent(&self, user_id: i64, limit: u64) -> Result<Vec<QueryLogEntry>> {
        QueryHistory::find()
            .filter(query_history::Column::UserId.eq(user_id))
            .order_by_desc(query_history::Column::CreatedAt)
            .order_by_desc(query_history::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query recent log entries")
    }

    /// Highest-count non-null parameter for the user. Ties resolve in
    /// whatever order SQLite groups them.
    pub async fn most_frequent_parameter(&self, user_id: i64) -> Result<Option<String>> {
        let top: Option<(Option<String>, i64)> = QueryHistory::find()
            .select_only()
            .column(query_history::Column::Parameter)
            .column_as(query_history::Column::Id.count(), "hits")
            .filter(query_history::Column::UserId.eq(user_id))
            .filter(query_history::Column::Parameter.is_not_null())
            .group_by(query_history::Column::Parameter)
            .order_by_desc(query_history::Column::Id.count())
            .into_tuple()
            .one(&self.conn)
            .await
            .context("Failed to aggregate query parameters")?;

        Ok(top.and_then(|(parameter, _)| parameter))
    }

    /// Most queried parameters across all users.
    pub async fn top_parameters(&self, limit: u64) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(Option<String>, i64)> = QueryHistory::find()
            .select_only()
            .column(query_history::Column::Parameter)
            .column_as(query_history::Column::Id.count(), "hits")
            .filter(query_history::Column::Parameter.is_not_null())
            .group_by(query_history::Column::Parameter)
            .order_by_desc(query_history::Column::Id.count())
            .limit(limit)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to aggregate top parameters")?;

        Ok(rows
            .into_iter()
            .filter_map(|(parameter, hits)| parameter.map(|p| (p, hits)))
            .collect())
    }

    pub async fn count_for_user(&self, user_id: i64) -> Result<u64> {
        QueryHistory::find()
            .filter(query_history::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count user queries")
    }

    pub async fn count(&self) -> Result<u64> {
        QueryHistory::find()
            .count(&self.conn)
            .await
            .context("Failed to count queries")
    }
}
