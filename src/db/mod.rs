use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::favorite::FavoriteTeam;
pub use repositories::query_log::QueryLogEntry;
pub use repositories::user::{NewUser, UserRecord};

/// Fixed-width UTC timestamp (`2026-01-01T10:00:00.000000Z`).
///
/// Every stored timestamp goes through here so string comparison in SQL
/// matches chronological order.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a timestamp written by [`format_timestamp`].
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Handle to the embedded database.
///
/// Constructed once at startup and passed by clone to every component that
/// needs storage; `close` ends its lifecycle at shutdown.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 1, 1).await
    }

    /// Opens (creating when needed) the database and applies migrations.
    ///
    /// SQLite allows a single writer, so the default pool is one connection.
    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to database: {db_url}"))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply database migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Closes the underlying pool. Other clones of this store become unusable.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .context("Failed to close database connection")?;
        info!("Database connection closed");
        Ok(())
    }

    #[must_use]
    pub fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn query_log_repo(&self) -> repositories::query_log::QueryLogRepository {
        repositories::query_log::QueryLogRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    // ========== Statistics ==========

    pub async fn total_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    pub async fn total_queries(&self) -> Result<u64> {
        self.query_log_repo().count().await
    }

    pub async fn cache_entry_count(&self) -> Result<u64> {
        self.cache_repo().count().await
    }

    pub async fn top_parameters(&self, limit: u64) -> Result<Vec<(String, i64)>> {
        self.query_log_repo().top_parameters(limit).await
    }
}
