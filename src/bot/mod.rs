//! Chat dispatcher.
//!
//! Turns one decoded Telegram update into the replies to send, recording
//! activity, preferences and the usage log on the way.

pub mod keyboards;

use crate::constants::limits;
use crate::domain::command::{Callback, Command};
use crate::domain::{LeagueCode, Preference, PreferenceField, QueryType, UserId};
use crate::services::football::FootballSource;
use crate::services::preferences::PreferenceService;
use crate::services::usage::{UsageLog, render_entry};
use keyboards::Keyboard;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// An inbound update the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Message {
        chat_id: i64,
        sender: Sender,
        text: String,
    },
    Callback {
        query_id: String,
        chat_id: i64,
        user_id: UserId,
        data: String,
    },
}

impl Event {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::Callback { .. } => "callback",
        }
    }
}

/// A message to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat_id: i64, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[derive(Clone)]
pub struct Bot {
    football: Arc<dyn FootballSource>,
    preferences: PreferenceService,
    usage: UsageLog,
}

impl Bot {
    #[must_use]
    pub fn new(
        football: Arc<dyn FootballSource>,
        preferences: PreferenceService,
        usage: UsageLog,
    ) -> Self {
        Self {
            football,
            preferences,
            usage,
        }
    }

    /// Handles one update. Never fails: every error below has already been
    /// turned into a logged warning or a static reply.
    pub async fn handle(&self, event: Event) -> Vec<Reply> {
        metrics::counter!("bot_updates_total", "kind" => event.kind()).increment(1);

        match event {
            Event::Message {
                chat_id,
                sender,
                text,
            } => {
                self.preferences
                    .register(
                        sender.id,
                        sender.username.as_deref(),
                        sender.first_name.as_deref(),
                        sender.last_name.as_deref(),
                    )
                    .await;
                self.preferences.touch_activity(sender.id).await;

                debug!(user_id = %sender.id, text = %text, "Command received");
                self.on_command(chat_id, sender.id, Command::parse(&text))
                    .await
            }
            Event::Callback {
                chat_id,
                user_id,
                data,
                ..
            } => {
                self.preferences.touch_activity(user_id).await;

                debug!(user_id = %user_id, data = %data, "Callback received");
                match Callback::decode(&data) {
                    Some(callback) => self.on_callback(chat_id, user_id, callback).await,
                    None => vec![Reply::text(chat_id, keyboards::UNKNOWN_ACTION)],
                }
            }
        }
    }

    async fn on_command(&self, chat_id: i64, user: UserId, command: Command) -> Vec<Reply> {
        match command {
            Command::Start => vec![Reply::text(chat_id, keyboards::WELCOME)],
            Command::Help => vec![Reply::text(chat_id, keyboards::HELP)],
            Command::Leagues => vec![league_menu(chat_id)],
            Command::Teams => vec![team_menu(chat_id)],
            Command::Preferences => vec![Reply::text(chat_id, self.preferences_text(user).await)],
            Command::Stats => vec![Reply::text(chat_id, self.stats_text(user).await)],
            Command::Favorites => vec![self.favorites_reply(chat_id, user).await],
            Command::Today => {
                self.usage.log(user, QueryType::TodayMatches, None).await;
                vec![
                    Reply::text(chat_id, "⏳ Loading today's matches..."),
                    Reply::text(chat_id, self.football.today_matches().await),
                ]
            }
            Command::Search(Some(name)) => {
                self.usage
                    .log(user, QueryType::PlayerSearch, Some(&name))
                    .await;
                vec![
                    Reply::text(chat_id, format!("🔍 Searching: {name}...")),
                    Reply::text(chat_id, self.football.search_player(&name).await),
                ]
            }
            Command::Search(None) => vec![Reply::text(chat_id, keyboards::SEARCH_USAGE)],
            Command::HeadToHead(Some((team1, team2))) => {
                let parameter = format!("{team1}_{team2}");
                self.usage
                    .log(user, QueryType::HeadToHead, Some(&parameter))
                    .await;
                vec![
                    Reply::text(chat_id, "⏳ Loading head-to-head history..."),
                    Reply::text(chat_id, self.football.head_to_head(team1, team2).await),
                ]
            }
            Command::HeadToHead(None) => vec![Reply::text(chat_id, keyboards::H2H_USAGE)],
            Command::Notifications(Some(enabled)) => {
                self.preferences
                    .set_preference(user, &Preference::Notifications(enabled))
                    .await;
                let state = if enabled { "enabled" } else { "disabled" };
                vec![Reply::text(chat_id, format!("🔔 Notifications {state}."))]
            }
            Command::Notifications(None) => vec![Reply::text(chat_id, keyboards::NOTIFY_USAGE)],
            Command::Unknown => vec![Reply::text(chat_id, keyboards::UNKNOWN_COMMAND)],
        }
    }

    async fn on_callback(&self, chat_id: i64, user: UserId, callback: Callback) -> Vec<Reply> {
        match callback {
            Callback::League(league) => {
                self.preferences
                    .set_preference(user, &Preference::PreferredLeague(league))
                    .await;
                vec![Reply::with_keyboard(
                    chat_id,
                    format!(
                        "✅ Selected: {}\n\n📋 What would you like to see?",
                        league.display_name()
                    ),
                    keyboards::league_options(league),
                )]
            }
            Callback::Standings(league) => {
                self.usage
                    .log(user, QueryType::Standings, Some(league.code()))
                    .await;
                vec![
                    Reply::text(chat_id, "⏳ Loading standings..."),
                    Reply::text(chat_id, self.football.standings(league).await),
                ]
            }
            Callback::Matches(league) => {
                self.usage
                    .log(user, QueryType::Matches, Some(league.code()))
                    .await;
                vec![
                    Reply::text(chat_id, "⏳ Loading matches..."),
                    Reply::text(chat_id, self.football.scheduled_matches(league).await),
                ]
            }
            Callback::TopScorers(league) => {
                self.usage
                    .log(user, QueryType::TopScorers, Some(league.code()))
                    .await;
                vec![
                    Reply::text(chat_id, "⏳ Loading top scorers..."),
                    Reply::text(chat_id, self.football.top_scorers(league).await),
                ]
            }
            Callback::Team(team_id) => {
                self.usage
                    .log(user, QueryType::TeamInfo, Some(&team_id.to_string()))
                    .await;
                let is_favorite = self
                    .preferences
                    .favorite_teams(user)
                    .await
                    .iter()
                    .any(|t| i64::from(t.team_id) == i64::from(team_id));
                vec![
                    Reply::text(chat_id, "⏳ Loading team information..."),
                    Reply::with_keyboard(
                        chat_id,
                        self.football.team_info(team_id).await,
                        keyboards::team_actions(team_id, is_favorite),
                    ),
                ]
            }
            Callback::AddFavorite(team_id) => {
                let name = team_display_name(team_id);
                let text = if self
                    .preferences
                    .add_favorite_team(user, team_id, &name)
                    .await
                {
                    self.preferences
                        .set_preference(user, &Preference::FavoriteTeam(name.clone()))
                        .await;
                    info!(user_id = %user, team_id, "Favorite team added");
                    format!("⭐ {name} added to your favorites.")
                } else {
                    format!("ℹ️ {name} is already in your favorites.")
                };
                vec![Reply::with_keyboard(
                    chat_id,
                    text,
                    keyboards::team_actions(team_id, true),
                )]
            }
            Callback::RemoveFavorite(team_id) => {
                let name = team_display_name(team_id);
                let text = if self.preferences.remove_favorite_team(user, team_id).await {
                    format!("💔 {name} removed from your favorites.")
                } else {
                    format!("ℹ️ {name} was not in your favorites.")
                };
                vec![Reply::with_keyboard(
                    chat_id,
                    text,
                    keyboards::team_actions(team_id, false),
                )]
            }
            Callback::BackToLeagues => vec![league_menu(chat_id)],
            Callback::BackToTeams => vec![team_menu(chat_id)],
        }
    }

    async fn preferences_text(&self, user: UserId) -> String {
        let mut out = String::from("⚙️ YOUR PREFERENCES\n\n");

        match self
            .preferences
            .get_preference(user, PreferenceField::PreferredLeague)
            .await
        {
            Some(Preference::PreferredLeague(league)) => {
                let _ = writeln!(out, "🏆 Preferred league: {}", league.display_name());
            }
            _ => out.push_str("🏆 Preferred league: Not set\n"),
        }

        match self
            .preferences
            .get_preference(user, PreferenceField::FavoriteTeam)
            .await
        {
            Some(Preference::FavoriteTeam(team)) => {
                let _ = writeln!(out, "⭐ Favorite team: {team}");
            }
            _ => out.push_str("⭐ Favorite team: Not set\n"),
        }

        if let Some(most) = self.usage.most_frequent_category(user).await {
            let label = most
                .parse::<LeagueCode>()
                .map_or(most.clone(), |league| league.display_name().to_string());
            let _ = writeln!(out, "📊 Most queried: {label}");
        }

        let notifications = matches!(
            self.preferences
                .get_preference(user, PreferenceField::Notifications)
                .await,
            Some(Preference::Notifications(true))
        );
        let _ = writeln!(
            out,
            "🔔 Notifications: {}",
            if notifications { "on" } else { "off" }
        );

        out.push_str("\n💡 Use /leagues to look up more data!");
        out
    }

    async fn stats_text(&self, user: UserId) -> String {
        let mut out = String::from("📈 YOUR STATISTICS\n\n");

        let summary = self.usage.user_summary(user).await;
        let _ = write!(
            out,
            "💬 Messages: {}\n🔎 Queries: {}\n⭐ Favorite teams: {}\n\n",
            summary.message_count, summary.total_queries, summary.favorite_teams
        );

        let history = self.usage.recent(user, limits::STATS_HISTORY).await;
        if history.is_empty() {
            out.push_str("📭 No searches yet.\n");
        } else {
            let _ = writeln!(out, "📜 Last {} searches:", limits::STATS_HISTORY);
            for entry in &history {
                let _ = writeln!(out, "• {}", render_entry(entry));
            }
        }

        out.push_str("\n💡 Use /leagues to get started!");
        out
    }

    async fn favorites_reply(&self, chat_id: i64, user: UserId) -> Reply {
        let favorites = self.preferences.favorite_teams(user).await;
        if favorites.is_empty() {
            return Reply::text(
                chat_id,
                "⭐ You have no favorite teams yet. Open /teams and add one!",
            );
        }

        let mut text = String::from("⭐ YOUR FAVORITE TEAMS\n\n");
        let mut buttons = Vec::with_capacity(favorites.len());
        for team in &favorites {
            let _ = writeln!(text, "• {}", team.team_name);
            if let Ok(id) = u32::try_from(team.team_id) {
                buttons.push(keyboards::Button::new(
                    format!("💔 {}", team.team_name),
                    Callback::RemoveFavorite(id),
                ));
            }
        }

        Reply::with_keyboard(chat_id, text, Keyboard::column(buttons))
    }
}

fn league_menu(chat_id: i64) -> Reply {
    Reply::with_keyboard(chat_id, "🏆 Pick a league:", keyboards::leagues())
}

fn team_menu(chat_id: i64) -> Reply {
    Reply::with_keyboard(
        chat_id,
        "🏟️ Pick a team for detailed info:",
        keyboards::teams(),
    )
}

fn team_display_name(team_id: u32) -> String {
    keyboards::featured_team_name(team_id)
        .map_or_else(|| format!("Team {team_id}"), str::to_string)
}
