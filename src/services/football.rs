//! Cache-through football data service.
//!
//! Each artifact is fetched from the feed, rendered to chat text and stored
//! under its own key and TTL. Empty results and upstream failures become
//! static text and are never cached.

use crate::clients::ApiError;
use crate::clients::football::{
    FootballDataClient, Match, MatchStatus, MatchesResponse, Person, PersonsResponse,
    ScorersResponse, StandingsResponse, Team,
};
use crate::config::CacheConfig;
use crate::constants::{cache::TODAY_KEY, limits};
use crate::domain::LeagueCode;
use crate::services::cache::ResponseCache;
use async_trait::async_trait;
use std::fmt::{Display, Write as _};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Raw football data, as returned by the upstream API.
#[async_trait]
pub trait FootballFeed: Send + Sync {
    async fn standings(&self, league: LeagueCode) -> Result<StandingsResponse, ApiError>;
    async fn scheduled_matches(&self, league: LeagueCode) -> Result<MatchesResponse, ApiError>;
    async fn top_scorers(&self, league: LeagueCode, limit: u32) -> Result<ScorersResponse, ApiError>;
    async fn team(&self, team_id: u32) -> Result<Team, ApiError>;
    async fn matches_today(&self) -> Result<MatchesResponse, ApiError>;
    async fn team_matches(&self, team_id: u32) -> Result<MatchesResponse, ApiError>;
    async fn search_persons(&self, name: &str) -> Result<PersonsResponse, ApiError>;
}

#[async_trait]
impl FootballFeed for FootballDataClient {
    async fn standings(&self, league: LeagueCode) -> Result<StandingsResponse, ApiError> {
        Self::standings(self, league).await
    }

    async fn scheduled_matches(&self, league: LeagueCode) -> Result<MatchesResponse, ApiError> {
        Self::scheduled_matches(self, league).await
    }

    async fn top_scorers(&self, league: LeagueCode, limit: u32) -> Result<ScorersResponse, ApiError> {
        Self::top_scorers(self, league, limit).await
    }

    async fn team(&self, team_id: u32) -> Result<Team, ApiError> {
        Self::team(self, team_id).await
    }

    async fn matches_today(&self) -> Result<MatchesResponse, ApiError> {
        Self::matches_today(self).await
    }

    async fn team_matches(&self, team_id: u32) -> Result<MatchesResponse, ApiError> {
        Self::team_matches(self, team_id).await
    }

    async fn search_persons(&self, name: &str) -> Result<PersonsResponse, ApiError> {
        Self::search_persons(self, name).await
    }
}

/// Chat-ready football answers. Every method returns text to send as-is.
#[async_trait]
pub trait FootballSource: Send + Sync {
    async fn standings(&self, league: LeagueCode) -> String;
    async fn scheduled_matches(&self, league: LeagueCode) -> String;
    async fn top_scorers(&self, league: LeagueCode) -> String;
    async fn team_info(&self, team_id: u32) -> String;
    async fn today_matches(&self) -> String;
    async fn search_player(&self, name: &str) -> String;
    async fn head_to_head(&self, team1: u32, team2: u32) -> String;
}

pub mod messages {
    pub const STANDINGS_UNAVAILABLE: &str = "❌ Standings are not available for this competition.";
    pub const STANDINGS_ERROR: &str =
        "❌ Could not load the standings. Check that the competition is active.";
    pub const NO_SCHEDULED_MATCHES: &str = "❌ No matches scheduled at the moment.";
    pub const MATCHES_ERROR: &str = "❌ Could not load the matches.";
    pub const SCORERS_UNAVAILABLE: &str =
        "❌ Top scorers are not available for this competition.";
    pub const SCORERS_ERROR: &str = "❌ Could not load the top scorers.";
    pub const TEAM_UNAVAILABLE: &str = "❌ Team information is not available.";
    pub const TEAM_ERROR: &str = "❌ Could not load the team information.";
    pub const NO_MATCHES_TODAY: &str = "❌ No matches scheduled today.";
    pub const TODAY_ERROR: &str = "❌ Could not load today's matches.";
    pub const SEARCH_ERROR: &str = "❌ Player search failed.";
    pub const NO_MEETINGS: &str = "❌ No head-to-head meetings found between these teams.";
    pub const HEAD_TO_HEAD_ERROR: &str = "❌ Could not load the head-to-head history.";
}

enum Miss {
    Empty,
    Upstream(ApiError),
}

struct Artifact<'a> {
    key: String,
    category: Option<&'a str>,
    ttl_minutes: i64,
    empty: &'a str,
    error: &'a str,
}

#[derive(Clone)]
pub struct FootballService {
    feed: Arc<dyn FootballFeed>,
    cache: ResponseCache,
    ttl: CacheConfig,
}

impl FootballService {
    #[must_use]
    pub fn new(feed: Arc<dyn FootballFeed>, cache: ResponseCache, ttl: CacheConfig) -> Self {
        Self { feed, cache, ttl }
    }

    async fn cached<T, Fut, R>(&self, artifact: Artifact<'_>, fetch: Fut, render: R) -> String
    where
        Fut: Future<Output = Result<T, ApiError>> + Send,
        R: FnOnce(&T) -> Option<String> + Send,
        T: Send,
    {
        let result = self
            .cache
            .get_or_insert_with(
                &artifact.key,
                artifact.category,
                artifact.ttl_minutes,
                move || async move {
                    let data = fetch.await.map_err(Miss::Upstream)?;
                    render(&data).ok_or(Miss::Empty)
                },
            )
            .await;

        match result {
            Ok(text) => text,
            Err(Miss::Empty) => {
                debug!(key = %artifact.key, "Upstream returned nothing to show");
                artifact.empty.to_string()
            }
            Err(Miss::Upstream(e)) => {
                warn!(key = %artifact.key, error = %e, "Football data request failed");
                artifact.error.to_string()
            }
        }
    }
}

#[async_trait]
impl FootballSource for FootballService {
    async fn standings(&self, league: LeagueCode) -> String {
        let artifact = Artifact {
            key: format!("standings_{league}"),
            category: Some(league.code()),
            ttl_minutes: self.ttl.standings,
            empty: messages::STANDINGS_UNAVAILABLE,
            error: messages::STANDINGS_ERROR,
        };
        self.cached(artifact, self.feed.standings(league), format_standings)
            .await
    }

    async fn scheduled_matches(&self, league: LeagueCode) -> String {
        let artifact = Artifact {
            key: format!("matches_{league}"),
            category: Some(league.code()),
            ttl_minutes: self.ttl.matches,
            empty: messages::NO_SCHEDULED_MATCHES,
            error: messages::MATCHES_ERROR,
        };
        self.cached(
            artifact,
            self.feed.scheduled_matches(league),
            format_scheduled_matches,
        )
        .await
    }

    async fn top_scorers(&self, league: LeagueCode) -> String {
        let artifact = Artifact {
            key: format!("topscorers_{league}"),
            category: Some(league.code()),
            ttl_minutes: self.ttl.top_scorers,
            empty: messages::SCORERS_UNAVAILABLE,
            error: messages::SCORERS_ERROR,
        };
        #[allow(clippy::cast_possible_truncation)]
        let limit = limits::TOP_SCORERS as u32;
        self.cached(
            artifact,
            self.feed.top_scorers(league, limit),
            format_top_scorers,
        )
        .await
    }

    async fn team_info(&self, team_id: u32) -> String {
        let artifact = Artifact {
            key: format!("team_{team_id}"),
            category: None,
            ttl_minutes: self.ttl.team,
            empty: messages::TEAM_UNAVAILABLE,
            error: messages::TEAM_ERROR,
        };
        self.cached(artifact, self.feed.team(team_id), format_team).await
    }

    async fn today_matches(&self) -> String {
        let artifact = Artifact {
            key: TODAY_KEY.to_string(),
            category: None,
            ttl_minutes: self.ttl.today,
            empty: messages::NO_MATCHES_TODAY,
            error: messages::TODAY_ERROR,
        };
        self.cached(artifact, self.feed.matches_today(), format_today_matches)
            .await
    }

    async fn search_player(&self, name: &str) -> String {
        match self.feed.search_persons(name).await {
            Ok(found) => format_persons(name, &found.persons)
                .unwrap_or_else(|| format!("❌ No player found named: {name}")),
            Err(e) => {
                warn!(name, error = %e, "Player search failed");
                messages::SEARCH_ERROR.to_string()
            }
        }
    }

    async fn head_to_head(&self, team1: u32, team2: u32) -> String {
        let artifact = Artifact {
            key: format!("h2h_{team1}_{team2}"),
            category: None,
            ttl_minutes: self.ttl.head_to_head,
            empty: messages::NO_MEETINGS,
            error: messages::HEAD_TO_HEAD_ERROR,
        };
        self.cached(artifact, self.feed.team_matches(team1), |response| {
            format_head_to_head(team1, team2, &response.matches)
        })
        .await
    }
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn goals(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn competition_name(competition: Option<&crate::clients::football::Competition>) -> &str {
    competition.and_then(|c| c.name.as_deref()).unwrap_or("")
}

/// Medal for the podium, then coloured bands for European places and
/// relegation.
#[must_use]
pub const fn position_marker(position: u32) -> &'static str {
    match position {
        1 => "🥇",
        2 => "🥈",
        3 => "🥉",
        4 => "🟢",
        5 | 6 => "🔵",
        p if p >= 18 => "🔴",
        _ => "⚪",
    }
}

#[must_use]
pub fn format_standings(response: &StandingsResponse) -> Option<String> {
    let table = &response.standings.first()?.table;
    if table.is_empty() {
        return None;
    }

    let mut out = format!(
        "📊 STANDINGS\n{}\n\n",
        competition_name(response.competition.as_ref())
    );

    for row in table.iter().take(limits::STANDINGS_ROWS) {
        let diff = row
            .goal_difference
            .map_or_else(|| "N/A".to_string(), |d| format!("{d:+}"));
        let _ = writeln!(
            out,
            "{} {}. {}",
            position_marker(row.position),
            row.position,
            row.team.name.as_deref().unwrap_or("N/A")
        );
        let _ = write!(
            out,
            "   Pts: {} | P: {} | W:{} D:{} L:{} | GF:{} GA:{} Diff:{diff}\n\n",
            or_na(row.points),
            or_na(row.played_games),
            or_na(row.won),
            or_na(row.draw),
            or_na(row.lost),
            or_na(row.goals_for),
            or_na(row.goals_against),
        );
    }

    Some(out)
}

#[must_use]
pub fn format_scheduled_matches(response: &MatchesResponse) -> Option<String> {
    if response.matches.is_empty() {
        return None;
    }

    let mut out = format!(
        "⚽ UPCOMING MATCHES\n{}\n\n",
        competition_name(response.competition.as_ref())
    );

    for m in response.matches.iter().take(limits::SCHEDULED_MATCHES) {
        if let Some(matchday) = m.matchday {
            let _ = write!(out, "Matchday {matchday} - ");
        }
        let when = m.utc_date.map_or_else(
            || "Date TBD".to_string(),
            |d| d.format("%d/%m/%Y %H:%M").to_string(),
        );
        let _ = write!(
            out,
            "{when}\n{} vs {}\n\n",
            m.home_team.name.as_deref().unwrap_or("N/A"),
            m.away_team.name.as_deref().unwrap_or("N/A")
        );
    }

    Some(out)
}

#[must_use]
pub fn format_top_scorers(response: &ScorersResponse) -> Option<String> {
    if response.scorers.is_empty() {
        return None;
    }

    let mut out = format!(
        "🥇 TOP SCORERS\n{}\n\n",
        competition_name(response.competition.as_ref())
    );

    for (i, scorer) in response.scorers.iter().take(limits::TOP_SCORERS).enumerate() {
        let rank = match i {
            0 => "🥇".to_string(),
            1 => "🥈".to_string(),
            2 => "🥉".to_string(),
            _ => format!("{}.", i + 1),
        };
        let _ = write!(
            out,
            "{rank} {} ({})\n   ⚽ Goals: {}",
            scorer.player.name.as_deref().unwrap_or("N/A"),
            scorer.team.name.as_deref().unwrap_or("N/A"),
            goals(scorer.goals)
        );
        if let Some(assists) = scorer.assists {
            let _ = write!(out, " | 🅰️ Assists: {assists}");
        }
        if let Some(penalties) = scorer.penalties.filter(|p| *p > 0) {
            let _ = write!(out, " | 🎯 Penalties: {penalties}");
        }
        out.push_str("\n\n");
    }

    Some(out)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct SquadRoles {
    goalkeepers: usize,
    defenders: usize,
    midfielders: usize,
    forwards: usize,
}

fn count_roles(squad: &[Person]) -> SquadRoles {
    squad
        .iter()
        .filter_map(|p| p.position.as_deref())
        .fold(SquadRoles::default(), |mut roles, position| {
            if position.contains("Goalkeeper") {
                roles.goalkeepers += 1;
            } else if position.contains("Defence") {
                roles.defenders += 1;
            } else if position.contains("Midfield") {
                roles.midfielders += 1;
            } else if position.contains("Offence") {
                roles.forwards += 1;
            }
            roles
        })
}

#[must_use]
pub fn format_team(team: &Team) -> Option<String> {
    let name = team.name.as_deref()?;

    let mut out = String::from("🏟️ TEAM INFO\n\n");
    let _ = writeln!(out, "📌 Name: {name}");
    let _ = writeln!(out, "🔤 Short name: {}", or_na(team.short_name.as_deref()));
    let _ = writeln!(out, "📅 Founded: {}", or_na(team.founded));
    let _ = writeln!(out, "🏟️ Venue: {}", or_na(team.venue.as_deref()));
    let _ = write!(out, "🎨 Colours: {}\n\n", or_na(team.club_colors.as_deref()));

    if !team.squad.is_empty() {
        let roles = count_roles(&team.squad);
        let _ = write!(out, "👥 SQUAD ({} players)\n\n", team.squad.len());
        let _ = writeln!(out, "🧤 Goalkeepers: {}", roles.goalkeepers);
        let _ = writeln!(out, "🛡️ Defenders: {}", roles.defenders);
        let _ = writeln!(out, "⚙️ Midfielders: {}", roles.midfielders);
        let _ = writeln!(out, "⚡ Forwards: {}", roles.forwards);
    }

    Some(out)
}

const fn status_marker(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Scheduled | MatchStatus::Timed => "⏰",
        MatchStatus::InPlay => "🔴",
        MatchStatus::Paused => "⏸️",
        MatchStatus::Finished => "✅",
        _ => "⚪",
    }
}

#[must_use]
pub fn format_today_matches(response: &MatchesResponse) -> Option<String> {
    if response.matches.is_empty() {
        return None;
    }

    let mut out = String::from("📅 TODAY'S MATCHES\n\n");

    for m in response.matches.iter().take(limits::TODAY_MATCHES) {
        let kickoff = m
            .utc_date
            .map_or_else(|| "--:--".to_string(), |d| d.format("%H:%M").to_string());
        let _ = write!(
            out,
            "{} {kickoff} | {}\n   {} vs {}",
            status_marker(m.status),
            competition_name(m.competition.as_ref()),
            m.home_team.label(),
            m.away_team.label()
        );
        if m.status.has_score() {
            let score = m.full_time();
            let _ = write!(out, " ({}-{})", goals(score.home), goals(score.away));
        }
        out.push_str("\n\n");
    }

    Some(out)
}

#[must_use]
pub fn format_persons(query: &str, persons: &[Person]) -> Option<String> {
    if persons.is_empty() {
        return None;
    }

    let mut out = format!("🔍 SEARCH RESULTS: {query}\n\n");
    for (i, person) in persons.iter().take(limits::PLAYER_RESULTS).enumerate() {
        let _ = write!(
            out,
            "{}. {}\n   📅 Born: {}\n   🌍 Nationality: {}\n   ⚽ Position: {}\n\n",
            i + 1,
            or_na(person.name.as_deref()),
            or_na(person.date_of_birth.as_deref()),
            or_na(person.nationality.as_deref()),
            or_na(person.position.as_deref()),
        );
    }

    Some(out)
}

fn is_meeting(m: &Match, team1: u32, team2: u32) -> bool {
    matches!(
        (m.home_team.id, m.away_team.id),
        (Some(h), Some(a)) if (h == team1 && a == team2) || (h == team2 && a == team1)
    )
}

/// Last finished meetings between the two teams with a win/draw tally from
/// `team1`'s side. Meetings with an unknown score are listed but not tallied.
#[must_use]
pub fn format_head_to_head(team1: u32, team2: u32, matches: &[Match]) -> Option<String> {
    let meetings: Vec<&Match> = matches
        .iter()
        .filter(|m| m.status == MatchStatus::Finished && is_meeting(m, team1, team2))
        .take(limits::HEAD_TO_HEAD_MEETINGS)
        .collect();

    if meetings.is_empty() {
        return None;
    }

    let (mut team1_wins, mut draws, mut team2_wins) = (0, 0, 0);
    let mut out = String::from("⚔️ HEAD TO HEAD\n\n");

    for m in &meetings {
        let score = m.full_time();
        let _ = writeln!(
            out,
            "{} {}-{} {}",
            m.home_team.label(),
            goals(score.home),
            goals(score.away),
            m.away_team.label()
        );

        let (Some(home), Some(away)) = (score.home, score.away) else {
            continue;
        };
        let home_is_team1 = m.home_team.id == Some(team1);
        match home.cmp(&away) {
            std::cmp::Ordering::Greater if home_is_team1 => team1_wins += 1,
            std::cmp::Ordering::Greater => team2_wins += 1,
            std::cmp::Ordering::Less if home_is_team1 => team2_wins += 1,
            std::cmp::Ordering::Less => team1_wins += 1,
            std::cmp::Ordering::Equal => draws += 1,
        }
    }

    let name_of = |id: u32| {
        meetings
            .iter()
            .flat_map(|m| [&m.home_team, &m.away_team])
            .find(|t| t.id == Some(id))
            .map_or("N/A", |t| t.label())
    };

    let _ = write!(
        out,
        "\n📊 RECORD:\n{} wins: {team1_wins}\nDraws: {draws}\n{} wins: {team2_wins}\n",
        name_of(team1),
        name_of(team2)
    );

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::football::{Goals, Score, StandingGroup, TableRow, TeamRef};
    use crate::db::Store;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn team_ref(id: u32, name: &str) -> TeamRef {
        TeamRef {
            id: Some(id),
            name: Some(name.to_string()),
            short_name: Some(name.to_string()),
            tla: None,
        }
    }

    fn finished(home: (u32, &str), away: (u32, &str), score: (Option<u32>, Option<u32>)) -> Match {
        Match {
            id: None,
            utc_date: None,
            status: MatchStatus::Finished,
            matchday: None,
            home_team: team_ref(home.0, home.1),
            away_team: team_ref(away.0, away.1),
            score: Some(Score {
                full_time: Some(Goals {
                    home: score.0,
                    away: score.1,
                }),
            }),
            competition: None,
        }
    }

    fn row(position: u32, name: &str, diff: Option<i32>) -> TableRow {
        TableRow {
            position,
            team: team_ref(position, name),
            played_games: Some(20),
            won: Some(10),
            draw: Some(5),
            lost: Some(5),
            points: Some(35),
            goals_for: Some(30),
            goals_against: Some(20),
            goal_difference: diff,
        }
    }

    #[test]
    fn position_markers() {
        assert_eq!(position_marker(1), "🥇");
        assert_eq!(position_marker(3), "🥉");
        assert_eq!(position_marker(4), "🟢");
        assert_eq!(position_marker(6), "🔵");
        assert_eq!(position_marker(10), "⚪");
        assert_eq!(position_marker(18), "🔴");
        assert_eq!(position_marker(20), "🔴");
    }

    #[test]
    fn standings_render_signed_difference_and_unknowns() {
        let response = StandingsResponse {
            competition: None,
            standings: vec![StandingGroup {
                kind: Some("TOTAL".to_string()),
                table: vec![row(1, "Inter", Some(31)), row(19, "Lecce", Some(-12)), row(20, "Monza", None)],
            }],
        };

        let text = format_standings(&response).unwrap();
        assert!(text.contains("🥇 1. Inter\n   Pts: 35 | P: 20 | W:10 D:5 L:5 | GF:30 GA:20 Diff:+31"));
        assert!(text.contains("🔴 19. Lecce"));
        assert!(text.contains("Diff:-12"));
        assert!(text.contains("Diff:N/A"));
    }

    #[test]
    fn standings_are_capped_and_empty_is_none() {
        let rows = (1..=24).map(|p| row(p, "Team", Some(0))).collect();
        let response = StandingsResponse {
            competition: None,
            standings: vec![StandingGroup { kind: None, table: rows }],
        };
        let text = format_standings(&response).unwrap();
        assert!(text.contains(" 20. Team"));
        assert!(!text.contains(" 21. Team"));

        let empty = StandingsResponse {
            competition: None,
            standings: Vec::new(),
        };
        assert_eq!(format_standings(&empty), None);
    }

    #[test]
    fn today_shows_unknown_goals_as_dash() {
        let mut live = finished((108, "Inter"), (98, "Milan"), (Some(1), None));
        live.status = MatchStatus::InPlay;
        let mut upcoming = finished((5, "Bayern"), (4, "Dortmund"), (None, None));
        upcoming.status = MatchStatus::Timed;

        let text = format_today_matches(&MatchesResponse {
            competition: None,
            matches: vec![live, upcoming],
        })
        .unwrap();

        assert!(text.contains("🔴 --:-- | \n   Inter vs Milan (1--)"));
        assert!(text.contains("⏰ --:-- | \n   Bayern vs Dortmund\n"));
    }

    #[test]
    fn head_to_head_tallies_from_first_team_side() {
        let matches = vec![
            finished((108, "Inter"), (98, "Milan"), (Some(2), Some(1))),
            finished((98, "Milan"), (108, "Inter"), (Some(0), Some(0))),
            finished((98, "Milan"), (108, "Inter"), (Some(3), Some(1))),
            finished((108, "Inter"), (109, "Juventus"), (Some(1), Some(0))),
            finished((108, "Inter"), (98, "Milan"), (None, None)),
        ];

        let text = format_head_to_head(108, 98, &matches).unwrap();
        assert!(text.contains("Inter 2-1 Milan"));
        assert!(text.contains("Inter --- Milan"));
        assert!(!text.contains("Juventus"));
        assert!(text.ends_with("Inter wins: 1\nDraws: 1\nMilan wins: 1\n"));
    }

    #[test]
    fn head_to_head_without_meetings_is_none() {
        let mut scheduled = finished((108, "Inter"), (98, "Milan"), (None, None));
        scheduled.status = MatchStatus::Scheduled;
        assert_eq!(format_head_to_head(108, 98, &[scheduled]), None);
    }

    #[test]
    fn team_counts_roles() {
        let person = |position: &str| Person {
            id: None,
            name: Some("Player".to_string()),
            date_of_birth: None,
            nationality: None,
            position: Some(position.to_string()),
        };
        let team = Team {
            id: Some(108),
            name: Some("FC Internazionale Milano".to_string()),
            short_name: Some("Inter".to_string()),
            founded: Some(1908),
            venue: None,
            club_colors: Some("Blue / Black".to_string()),
            squad: vec![
                person("Goalkeeper"),
                person("Defence"),
                person("Centre-Back Defence"),
                person("Midfield"),
                person("Offence"),
            ],
        };

        let text = format_team(&team).unwrap();
        assert!(text.contains("📅 Founded: 1908"));
        assert!(text.contains("🏟️ Venue: N/A"));
        assert!(text.contains("👥 SQUAD (5 players)"));
        assert!(text.contains("🛡️ Defenders: 2"));
        assert!(text.contains("⚡ Forwards: 1"));
    }

    struct FakeFeed {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl FootballFeed for FakeFeed {
        async fn standings(&self, _league: LeagueCode) -> Result<StandingsResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ApiError::Status {
                    service: "football-data",
                    status: 503,
                    body: String::new(),
                });
            }
            Ok(StandingsResponse {
                competition: None,
                standings: vec![StandingGroup {
                    kind: None,
                    table: vec![row(1, "Inter", Some(31))],
                }],
            })
        }

        async fn scheduled_matches(&self, _league: LeagueCode) -> Result<MatchesResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(MatchesResponse {
                competition: None,
                matches: Vec::new(),
            })
        }

        async fn top_scorers(&self, _league: LeagueCode, _limit: u32) -> Result<ScorersResponse, ApiError> {
            unimplemented!()
        }

        async fn team(&self, _team_id: u32) -> Result<Team, ApiError> {
            unimplemented!()
        }

        async fn matches_today(&self) -> Result<MatchesResponse, ApiError> {
            unimplemented!()
        }

        async fn team_matches(&self, _team_id: u32) -> Result<MatchesResponse, ApiError> {
            unimplemented!()
        }

        async fn search_persons(&self, _name: &str) -> Result<PersonsResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(PersonsResponse { persons: Vec::new() })
        }
    }

    async fn service(fail: bool) -> (FootballService, Arc<FakeFeed>, Store) {
        let db_path = std::env::temp_dir()
            .join(format!("scorebot-football-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        let feed = Arc::new(FakeFeed {
            calls: AtomicUsize::new(0),
            fail,
        });
        let service = FootballService::new(
            feed.clone(),
            ResponseCache::new(store.clone()),
            CacheConfig::default(),
        );
        (service, feed, store)
    }

    #[tokio::test]
    async fn second_request_is_served_from_cache() {
        let (service, feed, store) = service(false).await;

        let first = service.standings(LeagueCode::SerieA).await;
        let second = service.standings(LeagueCode::SerieA).await;

        assert_eq!(first, second);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
        let row = store.cache_repo().get_entry("standings_SA").await.unwrap().unwrap();
        assert_eq!(row.category.as_deref(), Some("SA"));
    }

    #[tokio::test]
    async fn failures_and_empty_results_are_not_cached() {
        let (service, feed, store) = service(true).await;

        assert_eq!(
            service.standings(LeagueCode::PremierLeague).await,
            messages::STANDINGS_ERROR
        );
        assert_eq!(
            service.scheduled_matches(LeagueCode::PremierLeague).await,
            messages::NO_SCHEDULED_MATCHES
        );
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);

        service.standings(LeagueCode::PremierLeague).await;
        assert_eq!(feed.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn player_search_is_never_cached() {
        let (service, feed, store) = service(false).await;

        let text = service.search_player("Nobody").await;
        service.search_player("Nobody").await;

        assert_eq!(text, "❌ No player found named: Nobody");
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);
    }
}
