//! football-data.org v4 client.
//!
//! Every field the upstream may omit or send as `null` is an `Option`, so a
//! missing score is never mistaken for zero goals.

use super::{ApiError, check_status};
use crate::config::FootballConfig;
use crate::domain::LeagueCode;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: &str = "football-data";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub tla: Option<String>,
}

impl TeamRef {
    /// Short name when present, falling back to the full name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("N/A")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsResponse {
    pub competition: Option<Competition>,
    #[serde(default)]
    pub standings: Vec<StandingGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingGroup {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub table: Vec<TableRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub position: u32,
    #[serde(default)]
    pub team: TeamRef,
    pub played_games: Option<u32>,
    pub won: Option<u32>,
    pub draw: Option<u32>,
    pub lost: Option<u32>,
    pub points: Option<u32>,
    pub goals_for: Option<u32>,
    pub goals_against: Option<u32>,
    pub goal_difference: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Postponed,
    Suspended,
    Cancelled,
    Awarded,
    #[serde(other)]
    Unknown,
}

impl MatchStatus {
    /// Whether the match has a score worth showing.
    #[must_use]
    pub const fn has_score(self) -> bool {
        matches!(self, Self::InPlay | Self::Paused | Self::Finished)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Goals {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub full_time: Option<Goals>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Option<i64>,
    pub utc_date: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    pub matchday: Option<u32>,
    #[serde(default)]
    pub home_team: TeamRef,
    #[serde(default)]
    pub away_team: TeamRef,
    pub score: Option<Score>,
    pub competition: Option<Competition>,
}

impl Match {
    #[must_use]
    pub fn full_time(&self) -> Goals {
        self.score.and_then(|s| s.full_time).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchesResponse {
    pub competition: Option<Competition>,
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scorer {
    pub player: Person,
    #[serde(default)]
    pub team: TeamRef,
    pub goals: Option<u32>,
    pub assists: Option<u32>,
    pub penalties: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScorersResponse {
    pub competition: Option<Competition>,
    #[serde(default)]
    pub scorers: Vec<Scorer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub founded: Option<u32>,
    pub venue: Option<String>,
    pub club_colors: Option<String>,
    #[serde(default)]
    pub squad: Vec<Person>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonsResponse {
    #[serde(default)]
    pub persons: Vec<Person>,
}

#[derive(Debug, Clone)]
pub struct FootballDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FootballDataClient {
    pub fn new(config: &FootballConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("scorebot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        if self.api_key.is_empty() {
            return Err(ApiError::MissingApiKey { service: SERVICE });
        }

        let url = self.endpoint(path, query)?;
        debug!(%url, "Requesting football data");

        let response = self
            .client
            .get(url)
            .header("X-Auth-Token", &self.api_key)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        let body = check_status(SERVICE, response)
            .await?
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                service: SERVICE,
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })
    }

    pub async fn standings(&self, league: LeagueCode) -> Result<StandingsResponse, ApiError> {
        self.get_json(&format!("/competitions/{}/standings", league.code()), &[])
            .await
    }

    pub async fn scheduled_matches(&self, league: LeagueCode) -> Result<MatchesResponse, ApiError> {
        self.get_json(
            &format!("/competitions/{}/matches", league.code()),
            &[("status", "SCHEDULED")],
        )
        .await
    }

    pub async fn top_scorers(
        &self,
        league: LeagueCode,
        limit: u32,
    ) -> Result<ScorersResponse, ApiError> {
        let limit = limit.to_string();
        self.get_json(
            &format!("/competitions/{}/scorers", league.code()),
            &[("limit", limit.as_str())],
        )
        .await
    }

    pub async fn team(&self, team_id: u32) -> Result<Team, ApiError> {
        self.get_json(&format!("/teams/{team_id}"), &[]).await
    }

    /// Matches across every competition the key can see, for today.
    pub async fn matches_today(&self) -> Result<MatchesResponse, ApiError> {
        self.get_json("/matches", &[]).await
    }

    pub async fn team_matches(&self, team_id: u32) -> Result<MatchesResponse, ApiError> {
        self.get_json(&format!("/teams/{team_id}/matches"), &[]).await
    }

    pub async fn search_persons(&self, name: &str) -> Result<PersonsResponse, ApiError> {
        self.get_json("/persons", &[("name", name)]).await
    }
}
