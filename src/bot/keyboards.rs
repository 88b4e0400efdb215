//! Inline keyboards and the fixed chat texts.

use crate::domain::LeagueCode;
use crate::domain::command::Callback;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub callback: Callback,
}

impl Button {
    pub fn new(text: impl Into<String>, callback: Callback) -> Self {
        Self {
            text: text.into(),
            callback,
        }
    }
}

/// One button per row, as every menu in the bot is a vertical list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    #[must_use]
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// Telegram `InlineKeyboardMarkup`.
    #[must_use]
    pub fn to_markup(&self) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup {
            inline_keyboard: self
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| InlineKeyboardButton {
                            text: b.text.clone(),
                            callback_data: b.callback.encode(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

/// Teams offered by `/teams`: (football-data id, label).
pub const FEATURED_TEAMS: [(u32, &str); 15] = [
    (108, "⚫🔵 Inter"),
    (98, "🔴⚫ Milan"),
    (109, "⚪⚫ Juventus"),
    (100, "🟡🔴 Roma"),
    (113, "🔵⚪ Napoli"),
    (66, "🔴 Manchester United"),
    (65, "🔵 Manchester City"),
    (64, "🔴 Liverpool"),
    (61, "🔵 Chelsea"),
    (57, "⚪🔴 Arsenal"),
    (86, "⚪ Real Madrid"),
    (81, "🔴🔵 Barcelona"),
    (78, "🔴⚪ Atletico Madrid"),
    (5, "🔴 Bayern Munich"),
    (4, "🟡⚫ Borussia Dortmund"),
];

/// Plain team name for a featured team, without the colour badge.
#[must_use]
pub fn featured_team_name(team_id: u32) -> Option<&'static str> {
    FEATURED_TEAMS
        .iter()
        .find(|(id, _)| *id == team_id)
        .map(|(_, label)| label.split_once(' ').map_or(*label, |(_, name)| name))
}

#[must_use]
pub fn leagues() -> Keyboard {
    Keyboard::column(
        LeagueCode::ALL
            .into_iter()
            .map(|league| Button::new(league.display_name(), Callback::League(league))),
    )
}

#[must_use]
pub fn league_options(league: LeagueCode) -> Keyboard {
    Keyboard::column([
        Button::new("📊 Standings", Callback::Standings(league)),
        Button::new("⚽ Matches", Callback::Matches(league)),
        Button::new("🥇 Top scorers", Callback::TopScorers(league)),
        Button::new("⬅️ Back to leagues", Callback::BackToLeagues),
    ])
}

#[must_use]
pub fn teams() -> Keyboard {
    Keyboard::column(
        FEATURED_TEAMS
            .iter()
            .map(|(id, label)| Button::new(*label, Callback::Team(*id)))
            .chain(std::iter::once(Button::new(
                "⬅️ Main menu",
                Callback::BackToLeagues,
            ))),
    )
}

#[must_use]
pub fn team_actions(team_id: u32, is_favorite: bool) -> Keyboard {
    let toggle = if is_favorite {
        Button::new("💔 Remove from favorites", Callback::RemoveFavorite(team_id))
    } else {
        Button::new("⭐ Add to favorites", Callback::AddFavorite(team_id))
    };
    Keyboard::column([toggle, Button::new("⬅️ Back to teams", Callback::BackToTeams)])
}

pub const WELCOME: &str = "⚽ Welcome to ScoreBot! ⚽

Up-to-date information on:
• 📊 Standings of the major leagues
• ⚽ Upcoming matches
• 🥇 Top scorers

Use /leagues to start or /help for more information.";

pub const HELP: &str = "📋 AVAILABLE COMMANDS:

/start - Welcome message
/help - Show this message
/leagues - Pick a league
/teams - Detailed team info
/today - Today's matches
/search [name] - Search for a player
/h2h [id1] [id2] - Head-to-head between two teams
/favorites - Your favorite teams
/preferences - Your preferences
/notify on|off - Toggle notifications
/stats - Your statistics

📌 EXAMPLES:
/search Cristiano Ronaldo
/h2h 108 98

💡 Data is cached to speed up answers!";

pub const UNKNOWN_COMMAND: &str = "❌ Unknown command. Use /help to see the available commands.";

pub const SEARCH_USAGE: &str = "❌ Usage: /search First Last";

pub const H2H_USAGE: &str = "❌ Usage: /h2h <team id> <team id> (two different ids)";

pub const NOTIFY_USAGE: &str = "❌ Usage: /notify on|off";

pub const UNKNOWN_ACTION: &str = "❌ This button is no longer supported.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn league_menu_lists_every_league() {
        let keyboard = leagues();
        assert_eq!(keyboard.rows.len(), LeagueCode::ALL.len());
        let markup = keyboard.to_markup();
        assert_eq!(markup.inline_keyboard[0][0].callback_data, "league_SA");
        assert_eq!(markup.inline_keyboard[5][0].callback_data, "league_CL");
    }

    #[test]
    fn team_menu_ends_with_back_button() {
        let keyboard = teams();
        assert_eq!(keyboard.rows.len(), FEATURED_TEAMS.len() + 1);
        assert_eq!(
            keyboard.rows.last().unwrap()[0].callback,
            Callback::BackToLeagues
        );
    }

    #[test]
    fn featured_team_names_drop_the_badge() {
        assert_eq!(featured_team_name(108), Some("Inter"));
        assert_eq!(featured_team_name(4), Some("Borussia Dortmund"));
        assert_eq!(featured_team_name(1), None);
    }

    #[test]
    fn markup_serializes_for_telegram() {
        let json = serde_json::to_value(team_actions(86, false).to_markup()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "inline_keyboard": [
                    [{"text": "⭐ Add to favorites", "callback_data": "fav_86"}],
                    [{"text": "⬅️ Back to teams", "callback_data": "back_teams"}]
                ]
            })
        );
    }
}
