use crate::db::format_timestamp;
use crate::entities::{api_cache, prelude::*};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// Row-level access to the `api_cache` table.
///
/// Every time-dependent call takes `now` explicitly; the clock lives in the
/// service layer.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Payload of `key` if its row expires strictly after `now`.
    pub async fn get_live(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let entry = ApiCache::find_by_id(key.to_string())
            .filter(api_cache::Column::ExpiresAt.gt(format_timestamp(now)))
            .one(&self.conn)
            .await
            .context("Failed to query cache entry")?;

        Ok(entry.map(|e| e.payload))
    }

    /// Raw row regardless of expiry.
    pub async fn get_entry(&self, key: &str) -> Result<Option<api_cache::Model>> {
        ApiCache::find_by_id(key.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query cache entry")
    }

    /// Inserts the row or replaces every column of an existing row with the same key.
    pub async fn upsert(
        &self,
        key: &str,
        payload: &str,
        category: Option<&str>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let active_model = api_cache::ActiveModel {
            cache_key: Set(key.to_string()),
            payload: Set(payload.to_string()),
            category: Set(category.map(std::string::ToString::to_string)),
            created_at: Set(format_timestamp(created_at)),
            expires_at: Set(format_timestamp(expires_at)),
        };

        ApiCache::insert(active_model)
            .on_conflict(
                OnConflict::column(api_cache::Column::CacheKey)
                    .update_columns([
                        api_cache::Column::Payload,
                        api_cache::Column::Category,
                        api_cache::Column::CreatedAt,
                        api_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to write cache entry")?;

        Ok(())
    }

    /// Deletes rows whose expiry is at or before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = ApiCache::delete_many()
            .filter(api_cache::Column::ExpiresAt.lte(format_timestamp(now)))
            .exec(&self.conn)
            .await
            .context("Failed to delete expired cache entries")?;

        Ok(result.rows_affected)
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = ApiCache::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to clear cache")?;

        Ok(result.rows_affected)
    }

    pub async fn delete_category(&self, category: &str) -> Result<u64> {
        let result = ApiCache::delete_many()
            .filter(api_cache::Column::Category.eq(category))
            .exec(&self.conn)
            .await
            .context("Failed to delete cache category")?;

        Ok(result.rows_affected)
    }

    pub async fn count(&self) -> Result<u64> {
        ApiCache::find()
            .count(&self.conn)
            .await
            .context("Failed to count cache entries")
    }
}
