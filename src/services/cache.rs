//! Time-bounded response cache over the `api_cache` table.
//!
//! Callers supply a TTL per write, so one table serves artifacts with very
//! different freshness requirements. Storage failures never reach the caller:
//! a failed read is a miss and a failed write is logged and dropped.

use crate::db::Store;
use crate::db::repositories::cache::CacheRepository;
use chrono::{DateTime, Datelike, Duration, Utc};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }

}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct ResponseCache {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn repo(&self) -> CacheRepository {
        self.store.cache_repo()
    }

    /// Returns the payload only while the entry is live. A never-written key
    /// and an expired key are indistinguishable; reads never delete.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.repo().get_live(key, self.clock.now()).await {
            Ok(Some(payload)) => {
                debug!(key, "Cache hit");
                metrics::counter!("cache_hits_total").increment(1);
                Some(payload)
            }
            Ok(None) => {
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, treating as miss");
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    /// Upserts the entry with `expires_at = now + ttl_minutes`. Last writer wins.
    pub async fn put(&self, key: &str, payload: &str, category: Option<&str>, ttl_minutes: i64) {
        if ttl_minutes <= 0 {
            warn!(key, ttl_minutes, "Refusing to cache entry with non-positive TTL");
            return;
        }

        let now = self.clock.now();
        let Some(expires_at) = expiry(now, ttl_minutes) else {
            warn!(key, ttl_minutes, "Refusing to cache entry with out-of-range TTL");
            return;
        };

        match self
            .repo()
            .upsert(key, payload, category, now, expires_at)
            .await
        {
            Ok(()) => {
                debug!(key, ttl_minutes, "Cached response");
                metrics::counter!("cache_writes_total").increment(1);
            }
            Err(e) => warn!(key, error = %e, "Failed to cache response"),
        }
    }

    /// Serves `key` from the cache or runs `fetch`, caching its success.
    /// Errors from `fetch` are returned untouched and nothing is stored.
    pub async fn get_or_insert_with<F, Fut, E>(
        &self,
        key: &str,
        category: Option<&str>,
        ttl_minutes: i64,
        fetch: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(cached) = self.get(key).await {
            return Ok(cached);
        }

        let fresh = fetch().await?;
        self.put(key, &fresh, category, ttl_minutes).await;
        Ok(fresh)
    }

    /// Deletes every entry whose expiry has passed and returns how many went.
    pub async fn sweep_expired(&self) -> u64 {
        match self.repo().delete_expired(self.clock.now()).await {
            Ok(removed) => {
                if removed > 0 {
                    info!(removed, "Swept expired cache entries");
                }
                metrics::counter!("cache_swept_total").increment(removed);
                removed
            }
            Err(e) => {
                warn!(error = %e, "Cache sweep failed");
                0
            }
        }
    }

    pub async fn clear_all(&self) -> u64 {
        match self.repo().delete_all().await {
            Ok(removed) => {
                info!(removed, "Cleared response cache");
                removed
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear response cache");
                0
            }
        }
    }

    /// Drops every entry tagged with `category`, live or not.
    pub async fn invalidate_category(&self, category: &str) -> u64 {
        match self.repo().delete_category(category).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(category, error = %e, "Failed to invalidate cache category");
                0
            }
        }
    }
}

/// `now + ttl_minutes`, or `None` when the result cannot be represented as a
/// four-digit-year timestamp.
fn expiry(now: DateTime<Utc>, ttl_minutes: i64) -> Option<DateTime<Utc>> {
    Duration::try_minutes(ttl_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .filter(|at| at.year() <= 9999)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn test_cache() -> (ResponseCache, Arc<ManualClock>, Store) {
        let db_path =
            std::env::temp_dir().join(format!("scorebot-cache-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        ));
        let cache = ResponseCache::with_clock(store.clone(), clock.clone());
        (cache, clock, store)
    }

    #[tokio::test]
    async fn unknown_key_is_absent() {
        let (cache, _, _) = test_cache().await;
        assert_eq!(cache.get("standings_SA").await, None);
    }

    #[tokio::test]
    async fn put_then_get_returns_payload() {
        let (cache, _, _) = test_cache().await;
        cache.put("standings_SA", "table text", Some("SA"), 30).await;
        assert_eq!(cache.get("standings_SA").await.as_deref(), Some("table text"));
    }

    #[tokio::test]
    async fn entry_expires_without_being_deleted() {
        let (cache, clock, store) = test_cache().await;
        cache.put("standings_SA", "table text", Some("SA"), 30).await;

        clock.advance(Duration::minutes(31));

        assert_eq!(cache.get("standings_SA").await, None);
        assert!(store.cache_repo().get_entry("standings_SA").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn expiry_boundary_is_exclusive_for_reads() {
        let (cache, clock, _) = test_cache().await;
        cache.put("matches_today", "today", None, 5).await;

        clock.advance(Duration::minutes(5) - Duration::microseconds(1));
        assert!(cache.get("matches_today").await.is_some());

        clock.advance(Duration::microseconds(1));
        assert_eq!(cache.get("matches_today").await, None);
        assert_eq!(cache.sweep_expired().await, 1);
    }

    #[tokio::test]
    async fn second_write_replaces_first() {
        let (cache, clock, store) = test_cache().await;
        cache.put("team_108", "old", None, 120).await;
        clock.advance(Duration::minutes(10));
        cache.put("team_108", "new", Some("SA"), 60).await;

        assert_eq!(cache.get("team_108").await.as_deref(), Some("new"));

        let row = store.cache_repo().get_entry("team_108").await.unwrap().unwrap();
        assert_eq!(row.category.as_deref(), Some("SA"));
        assert_eq!(row.created_at, "2026-03-01T12:10:00.000000Z");
        assert_eq!(row.expires_at, "2026-03-01T13:10:00.000000Z");
        assert_eq!(store.cache_entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_rows() {
        let (cache, clock, store) = test_cache().await;
        cache.put("matches_SA", "short", Some("SA"), 10).await;
        cache.put("h2h_108_98", "long", None, 1440).await;
        let before = store.cache_repo().get_entry("h2h_108_98").await.unwrap();

        clock.advance(Duration::minutes(11));

        assert_eq!(cache.sweep_expired().await, 1);
        assert!(store.cache_repo().get_entry("matches_SA").await.unwrap().is_none());
        assert_eq!(store.cache_repo().get_entry("h2h_108_98").await.unwrap(), before);
        assert_eq!(cache.sweep_expired().await, 0);
    }

    #[tokio::test]
    async fn non_positive_ttl_is_ignored() {
        let (cache, _, store) = test_cache().await;
        cache.put("standings_PL", "table", Some("PL"), 0).await;
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn huge_ttl_is_ignored() {
        let (cache, _, store) = test_cache().await;

        cache.put("h2h_108_98", "history", None, i64::MAX).await;
        cache.put("h2h_108_98", "history", None, 5_000_000_000).await;

        assert_eq!(cache.get("h2h_108_98").await, None);
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);
    }

    #[test]
    fn expiry_stays_within_four_digit_years() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();

        assert_eq!(
            expiry(now, 30),
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(expiry(now, i64::MAX), None);
        assert_eq!(expiry(now, i64::MAX / 60), None);
        assert_eq!(expiry(now, 5_000_000_000), None);
    }

    #[tokio::test]
    async fn clear_all_and_category_invalidation() {
        let (cache, _, store) = test_cache().await;
        cache.put("standings_SA", "a", Some("SA"), 30).await;
        cache.put("matches_SA", "b", Some("SA"), 10).await;
        cache.put("standings_PL", "c", Some("PL"), 30).await;

        assert_eq!(cache.invalidate_category("SA").await, 2);
        assert_eq!(store.cache_entry_count().await.unwrap(), 1);

        assert_eq!(cache.clear_all().await, 1);
        assert_eq!(cache.get("standings_PL").await, None);
    }

    #[tokio::test]
    async fn get_or_insert_with_caches_success_only() {
        let (cache, _, _) = test_cache().await;

        let failed: Result<String, &str> = cache
            .get_or_insert_with("standings_CL", Some("CL"), 30, || async { Err("upstream down") })
            .await;
        assert_eq!(failed, Err("upstream down"));
        assert_eq!(cache.get("standings_CL").await, None);

        let fresh: Result<String, &str> = cache
            .get_or_insert_with("standings_CL", Some("CL"), 30, || async {
                Ok("fresh table".to_string())
            })
            .await;
        assert_eq!(fresh.as_deref(), Ok("fresh table"));

        let cached: Result<String, &str> = cache
            .get_or_insert_with("standings_CL", Some("CL"), 30, || async {
                Ok("should not be fetched".to_string())
            })
            .await;
        assert_eq!(cached.as_deref(), Ok("fresh table"));
    }

    #[tokio::test]
    async fn closed_store_degrades_to_miss() {
        let (cache, _, store) = test_cache().await;
        cache.put("standings_SA", "table", Some("SA"), 30).await;

        store.close().await.unwrap();

        assert_eq!(cache.get("standings_SA").await, None);
        cache.put("standings_SA", "again", Some("SA"), 30).await;
        assert_eq!(cache.sweep_expired().await, 0);
    }
}
