//! Domain types for the bot with strong typing.
//!
//! Values that travel through callbacks, the usage log and the preference
//! store are modelled here once so the rest of the crate never matches on
//! raw strings.

pub mod command;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Telegram user identifier.
///
/// Telegram ids exceed the `i32` range, so the wrapper is 64-bit.
///
/// # Examples
///
/// ```rust
/// use scorebot::domain::UserId;
///
/// let id = UserId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown league code: {0}")]
pub struct ParseLeagueError(pub String);

/// Competitions offered in the league menu (football-data.org codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueCode {
    SerieA,
    PremierLeague,
    LaLiga,
    Bundesliga,
    Ligue1,
    ChampionsLeague,
}

impl LeagueCode {
    pub const ALL: [Self; 6] = [
        Self::SerieA,
        Self::PremierLeague,
        Self::LaLiga,
        Self::Bundesliga,
        Self::Ligue1,
        Self::ChampionsLeague,
    ];

    /// Upstream competition code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::SerieA => "SA",
            Self::PremierLeague => "PL",
            Self::LaLiga => "PD",
            Self::Bundesliga => "BL1",
            Self::Ligue1 => "FL1",
            Self::ChampionsLeague => "CL",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SerieA => "🇮🇹 Serie A",
            Self::PremierLeague => "🏴\u{e0067}\u{e0062}\u{e0065}\u{e006e}\u{e0067}\u{e007f} Premier League",
            Self::LaLiga => "🇪🇸 La Liga",
            Self::Bundesliga => "🇩🇪 Bundesliga",
            Self::Ligue1 => "🇫🇷 Ligue 1",
            Self::ChampionsLeague => "🏆 Champions League",
        }
    }
}

impl fmt::Display for LeagueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LeagueCode {
    type Err = ParseLeagueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|league| league.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLeagueError(s.to_string()))
    }
}

/// Kind of user action recorded in the usage log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Standings,
    Matches,
    TopScorers,
    TeamInfo,
    TodayMatches,
    PlayerSearch,
    HeadToHead,
}

impl QueryType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standings => "STANDINGS",
            Self::Matches => "MATCHES",
            Self::TopScorers => "TOPSCORERS",
            Self::TeamInfo => "TEAM_INFO",
            Self::TodayMatches => "TODAY_MATCHES",
            Self::PlayerSearch => "PLAYER_SEARCH",
            Self::HeadToHead => "HEAD_TO_HEAD",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selects one targeted column of the preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceField {
    PreferredLeague,
    FavoriteTeam,
    Notifications,
}

/// A typed preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference {
    PreferredLeague(LeagueCode),
    FavoriteTeam(String),
    Notifications(bool),
}

impl Preference {
    #[must_use]
    pub const fn field(&self) -> PreferenceField {
        match self {
            Self::PreferredLeague(_) => PreferenceField::PreferredLeague,
            Self::FavoriteTeam(_) => PreferenceField::FavoriteTeam,
            Self::Notifications(_) => PreferenceField::Notifications,
        }
    }
}
