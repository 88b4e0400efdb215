use crate::db::{FavoriteTeam, NewUser, Store, UserRecord};
use crate::domain::{LeagueCode, Preference, PreferenceField, UserId};
use crate::entities::users;
use crate::services::cache::{Clock, SystemClock};
use sea_orm::sea_query::Expr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-user identity and preference records.
///
/// Identity is first-write-wins; everything afterwards is a targeted column
/// update. Failures are logged and reported as "nothing changed".
#[derive(Clone)]
pub struct PreferenceService {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl PreferenceService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns `true` only when this call created the record.
    pub async fn register(
        &self,
        user_id: UserId,
        username: Option<&str>,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> bool {
        let identity = NewUser {
            username,
            first_name,
            last_name,
        };

        match self
            .store
            .user_repo()
            .insert_if_absent(user_id.value(), &identity, self.clock.now())
            .await
        {
            Ok(true) => {
                info!(user_id = %user_id, username, "Registered new user");
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to register user");
                false
            }
        }
    }

    /// Refreshes last activity and counts the interaction. Unknown users are
    /// left alone.
    pub async fn touch_activity(&self, user_id: UserId) {
        match self
            .store
            .user_repo()
            .touch(user_id.value(), self.clock.now())
            .await
        {
            Ok(0) => debug!(user_id = %user_id, "Activity for unknown user ignored"),
            Ok(_) => {}
            Err(e) => warn!(user_id = %user_id, error = %e, "Failed to update activity"),
        }
    }

    /// Returns whether a record was updated.
    pub async fn set_preference(&self, user_id: UserId, preference: &Preference) -> bool {
        let (column, value) = match preference {
            Preference::PreferredLeague(league) => {
                (users::Column::PreferredLeague, Expr::value(league.code()))
            }
            Preference::FavoriteTeam(team) => {
                (users::Column::FavoriteTeam, Expr::value(team.clone()))
            }
            Preference::Notifications(enabled) => {
                (users::Column::NotificationsEnabled, Expr::value(*enabled))
            }
        };

        match self
            .store
            .user_repo()
            .set_column(user_id.value(), column, value)
            .await
        {
            Ok(rows) => rows > 0,
            Err(e) => {
                warn!(user_id = %user_id, field = ?preference.field(), error = %e, "Failed to save preference");
                false
            }
        }
    }

    /// `None` for unknown users and for fields that were never set.
    pub async fn get_preference(&self, user_id: UserId, field: PreferenceField) -> Option<Preference> {
        let user = self.user(user_id).await?;

        match field {
            PreferenceField::PreferredLeague => user
                .preferred_league
                .and_then(|code| code.parse::<LeagueCode>().ok())
                .map(Preference::PreferredLeague),
            PreferenceField::FavoriteTeam => user.favorite_team.map(Preference::FavoriteTeam),
            PreferenceField::Notifications => {
                Some(Preference::Notifications(user.notifications_enabled))
            }
        }
    }

    pub async fn user(&self, user_id: UserId) -> Option<UserRecord> {
        self.store
            .user_repo()
            .get(user_id.value())
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Failed to read user record");
                None
            })
    }

    /// Returns `false` when the team was already a favorite.
    pub async fn add_favorite_team(&self, user_id: UserId, team_id: u32, team_name: &str) -> bool {
        let Ok(team_id) = i32::try_from(team_id) else {
            warn!(user_id = %user_id, team_id, "Team id out of range");
            return false;
        };

        self.store
            .favorite_repo()
            .add(user_id.value(), team_id, team_name, self.clock.now())
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, team_id, error = %e, "Failed to add favorite team");
                false
            })
    }

    pub async fn remove_favorite_team(&self, user_id: UserId, team_id: u32) -> bool {
        let Ok(team_id) = i32::try_from(team_id) else {
            return false;
        };

        self.store
            .favorite_repo()
            .remove(user_id.value(), team_id)
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, team_id, error = %e, "Failed to remove favorite team");
                false
            })
    }

    /// Newest first.
    pub async fn favorite_teams(&self, user_id: UserId) -> Vec<FavoriteTeam> {
        self.store
            .favorite_repo()
            .list(user_id.value())
            .await
            .unwrap_or_else(|e| {
                warn!(user_id = %user_id, error = %e, "Failed to list favorite teams");
                Vec::new()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cache::ManualClock;
    use chrono::{Duration, TimeZone, Utc};

    async fn test_service() -> (PreferenceService, Arc<ManualClock>, Store) {
        let db_path =
            std::env::temp_dir().join(format!("scorebot-prefs-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
        ));
        (
            PreferenceService::with_clock(store.clone(), clock.clone()),
            clock,
            store,
        )
    }

    #[tokio::test]
    async fn register_is_first_write_wins() {
        let (prefs, _, store) = test_service().await;
        let id = UserId::new(42);

        assert!(prefs.register(id, Some("bob"), Some("Bob"), Some("X")).await);
        assert!(!prefs.register(id, Some("robert"), Some("Robert"), None).await);

        assert_eq!(store.total_users().await.unwrap(), 1);
        let user = prefs.user(id).await.unwrap();
        assert_eq!(user.username.as_deref(), Some("bob"));
        assert_eq!(user.first_name.as_deref(), Some("Bob"));
        assert_eq!(user.last_name.as_deref(), Some("X"));
        assert!(!user.notifications_enabled);
        assert_eq!(user.message_count, 0);
    }

    #[tokio::test]
    async fn touch_refreshes_activity_and_counts() {
        let (prefs, clock, _) = test_service().await;
        let id = UserId::new(5);
        prefs.register(id, None, Some("Ann"), None).await;

        clock.advance(Duration::minutes(3));
        prefs.touch_activity(id).await;
        prefs.touch_activity(id).await;

        let user = prefs.user(id).await.unwrap();
        assert_eq!(user.message_count, 2);
        assert_eq!(user.created_at, "2026-01-10T09:00:00.000000Z");
        assert_eq!(user.last_activity, "2026-01-10T09:03:00.000000Z");
    }

    #[tokio::test]
    async fn touch_unknown_user_is_a_no_op() {
        let (prefs, _, store) = test_service().await;
        prefs.touch_activity(UserId::new(999)).await;
        assert_eq!(store.total_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn preferences_round_trip() {
        let (prefs, _, _) = test_service().await;
        let id = UserId::new(11);
        prefs.register(id, Some("fan"), None, None).await;

        assert_eq!(prefs.get_preference(id, PreferenceField::PreferredLeague).await, None);
        assert_eq!(
            prefs.get_preference(id, PreferenceField::Notifications).await,
            Some(Preference::Notifications(false))
        );

        assert!(
            prefs
                .set_preference(id, &Preference::PreferredLeague(LeagueCode::SerieA))
                .await
        );
        assert!(
            prefs
                .set_preference(id, &Preference::FavoriteTeam("Inter".to_string()))
                .await
        );
        assert!(prefs.set_preference(id, &Preference::Notifications(true)).await);

        assert_eq!(
            prefs.get_preference(id, PreferenceField::PreferredLeague).await,
            Some(Preference::PreferredLeague(LeagueCode::SerieA))
        );
        assert_eq!(
            prefs.get_preference(id, PreferenceField::FavoriteTeam).await,
            Some(Preference::FavoriteTeam("Inter".to_string()))
        );
        assert_eq!(
            prefs.get_preference(id, PreferenceField::Notifications).await,
            Some(Preference::Notifications(true))
        );
    }

    #[tokio::test]
    async fn preferences_for_unknown_user() {
        let (prefs, _, _) = test_service().await;
        let ghost = UserId::new(404);

        assert!(!prefs.set_preference(ghost, &Preference::Notifications(true)).await);
        assert_eq!(prefs.get_preference(ghost, PreferenceField::Notifications).await, None);
    }

    #[tokio::test]
    async fn favorite_teams_are_unique_and_newest_first() {
        let (prefs, clock, _) = test_service().await;
        let id = UserId::new(8);

        assert!(prefs.add_favorite_team(id, 108, "Inter").await);
        clock.advance(Duration::minutes(1));
        assert!(prefs.add_favorite_team(id, 86, "Real Madrid").await);
        assert!(!prefs.add_favorite_team(id, 108, "Inter").await);

        let names: Vec<_> = prefs
            .favorite_teams(id)
            .await
            .into_iter()
            .map(|t| t.team_name)
            .collect();
        assert_eq!(names, ["Real Madrid", "Inter"]);

        assert!(prefs.remove_favorite_team(id, 108).await);
        assert!(!prefs.remove_favorite_team(id, 108).await);
        assert_eq!(prefs.favorite_teams(id).await.len(), 1);
    }
}
