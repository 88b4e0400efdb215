use crate::db::{QueryLogEntry, Store, parse_timestamp};
use crate::domain::{QueryType, UserId};
use crate::services::cache::{Clock, SystemClock};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-user activity totals shown by `/stats` and the `stats` CLI command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub message_count: i32,
    pub total_queries: u64,
    pub favorite_teams: u64,
}

/// Append-only log of user queries.
///
/// Writes never fail the caller and reads degrade to empty results when the
/// store misbehaves.
#[derive(Clone)]
pub struct UsageLog {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl UsageLog {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn log(&self, user_id: UserId, query_type: QueryType, parameter: Option<&str>) {
        let result = self
            .store
            .query_log_repo()
            .append(
                user_id.value(),
                query_type.as_str(),
                parameter,
                self.clock.now(),
            )
            .await;

        match result {
            Ok(()) => {
                debug!(user_id = %user_id, query_type = %query_type, parameter, "Logged query");
                metrics::counter!("queries_logged_total").increment(1);
            }
            Err(e) => warn!(user_id = %user_id, error = %e, "Failed to log query"),
        }
    }

    /// Newest first, at most `limit` entries.
    pub async fn recent(&self, user_id: UserId, limit: u64) -> Vec<QueryLogEntry> {
        self.store
            .query_log_repo()
            .recent(user_id.value(), limit)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Failed to read query history");
                Vec::new()
            })
    }

    /// Parameter this user queried most often.
    ///
    /// Ties are resolved by SQLite's grouping order, which is not defined.
    pub async fn most_frequent_category(&self, user_id: UserId) -> Option<String> {
        self.store
            .query_log_repo()
            .most_frequent_parameter(user_id.value())
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Failed to aggregate query history");
                None
            })
    }

    pub async fn top_parameters(&self, limit: u64) -> Vec<(String, i64)> {
        self.store.top_parameters(limit).await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to aggregate top parameters");
            Vec::new()
        })
    }

    pub async fn user_summary(&self, user_id: UserId) -> UserSummary {
        let id = user_id.value();

        let message_count = match self.store.user_repo().get(id).await {
            Ok(user) => user.map_or(0, |u| u.message_count),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to read user record");
                0
            }
        };
        let total_queries = self
            .store
            .query_log_repo()
            .count_for_user(id)
            .await
            .unwrap_or_default();
        let favorite_teams = self
            .store
            .favorite_repo()
            .count_for_user(id)
            .await
            .unwrap_or_default();

        UserSummary {
            message_count,
            total_queries,
            favorite_teams,
        }
    }
}

/// One history line: `TYPE - parameter (YYYY-MM-DD HH:MM:SS)`.
#[must_use]
pub fn render_entry(entry: &QueryLogEntry) -> String {
    let when = parse_timestamp(&entry.created_at).map_or_else(
        || entry.created_at.clone(),
        |at| at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    format!(
        "{} - {} ({when})",
        entry.query_type,
        entry.parameter.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    async fn test_store() -> Store {
        let db_path =
            std::env::temp_dir().join(format!("scorebot-usage-test-{}.db", uuid::Uuid::new_v4()));
        Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap()
    }

    async fn test_log() -> (UsageLog, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 2, 14, 20, 45, 0).unwrap(),
        ));
        (UsageLog::with_clock(test_store().await, clock.clone()), clock)
    }

    #[tokio::test]
    async fn log_then_recent_returns_that_entry() {
        let (log, _) = test_log().await;
        let user = UserId::new(7);

        log.log(user, QueryType::Standings, Some("SA")).await;

        let recent = log.recent(user, 1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].query_type, "STANDINGS");
        assert_eq!(recent[0].parameter.as_deref(), Some("SA"));
        assert_eq!(recent[0].user_id, 7);
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_capped() {
        let (log, clock) = test_log().await;
        let user = UserId::new(7);

        for league in ["SA", "PL", "PD", "BL1"] {
            log.log(user, QueryType::Matches, Some(league)).await;
            clock.advance(Duration::seconds(1));
        }
        log.log(UserId::new(8), QueryType::Matches, Some("CL")).await;

        let recent = log.recent(user, 3).await;
        let params: Vec<_> = recent.iter().filter_map(|e| e.parameter.as_deref()).collect();
        assert_eq!(params, ["BL1", "PD", "PL"]);
    }

    #[tokio::test]
    async fn same_instant_entries_keep_insertion_order() {
        let (log, _) = test_log().await;
        let user = UserId::new(1);

        log.log(user, QueryType::TodayMatches, None).await;
        log.log(user, QueryType::TeamInfo, Some("108")).await;

        let recent = log.recent(user, 10).await;
        assert_eq!(recent[0].query_type, "TEAM_INFO");
        assert_eq!(recent[1].query_type, "TODAY_MATCHES");
    }

    #[tokio::test]
    async fn most_frequent_category_ignores_missing_parameters() {
        let (log, _) = test_log().await;
        let user = UserId::new(3);

        assert_eq!(log.most_frequent_category(user).await, None);

        log.log(user, QueryType::TodayMatches, None).await;
        log.log(user, QueryType::TodayMatches, None).await;
        log.log(user, QueryType::TodayMatches, None).await;
        assert_eq!(log.most_frequent_category(user).await, None);

        log.log(user, QueryType::Standings, Some("PL")).await;
        log.log(user, QueryType::Matches, Some("SA")).await;
        log.log(user, QueryType::TopScorers, Some("SA")).await;
        assert_eq!(log.most_frequent_category(user).await.as_deref(), Some("SA"));
    }

    #[tokio::test]
    async fn summary_and_global_top() {
        let (log, _) = test_log().await;

        log.log(UserId::new(1), QueryType::Standings, Some("SA")).await;
        log.log(UserId::new(2), QueryType::Standings, Some("SA")).await;
        log.log(UserId::new(2), QueryType::Standings, Some("PL")).await;

        assert_eq!(log.top_parameters(1).await, vec![("SA".to_string(), 2)]);

        let summary = log.user_summary(UserId::new(2)).await;
        assert_eq!(summary.total_queries, 2);
        assert_eq!(summary.message_count, 0);
        assert_eq!(summary.favorite_teams, 0);
    }

    #[tokio::test]
    async fn closed_store_degrades_to_empty() {
        let store = test_store().await;
        let log = UsageLog::new(store.clone());
        let user = UserId::new(5);
        log.log(user, QueryType::Standings, Some("SA")).await;

        store.close().await.unwrap();

        log.log(user, QueryType::Matches, Some("PL")).await;
        assert!(log.recent(user, 10).await.is_empty());
        assert_eq!(log.most_frequent_category(user).await, None);
        assert!(log.top_parameters(5).await.is_empty());
        assert_eq!(log.user_summary(user).await, UserSummary::default());
    }

    #[test]
    fn renders_history_line() {
        let entry = QueryLogEntry {
            id: 1,
            user_id: 7,
            query_type: "STANDINGS".to_string(),
            parameter: Some("SA".to_string()),
            created_at: "2026-02-14T20:45:00.000000Z".to_string(),
        };
        assert_eq!(render_entry(&entry), "STANDINGS - SA (2026-02-14 20:45:00)");

        let bare = QueryLogEntry {
            parameter: None,
            ..entry
        };
        assert_eq!(render_entry(&bare), "STANDINGS - - (2026-02-14 20:45:00)");
    }
}
