//! Chat commands and inline-button callbacks, decoded once at the transport
//! boundary and dispatched by exhaustive matching.

use super::LeagueCode;

/// A slash command typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Leagues,
    Teams,
    Preferences,
    Stats,
    Today,
    /// `None` when the command was sent without a player name.
    Search(Option<String>),
    /// `None` when the two team ids are missing or malformed.
    HeadToHead(Option<(u32, u32)>),
    /// `None` when the argument was neither `on` nor `off`.
    Notifications(Option<bool>),
    Favorites,
    Unknown,
}

impl Command {
    /// Decodes a message text. Anything that is not a known command,
    /// including plain text, becomes [`Command::Unknown`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let Some(body) = text.strip_prefix('/') else {
            return Self::Unknown;
        };

        let (head, rest) = body
            .split_once(char::is_whitespace)
            .map_or((body, ""), |(head, rest)| (head, rest.trim()));

        // Group chats address commands as /cmd@botname
        let name = head
            .split_once('@')
            .map_or(head, |(name, _)| name)
            .to_ascii_lowercase();

        match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "leagues" | "campionati" => Self::Leagues,
            "teams" | "squadre" => Self::Teams,
            "preferences" | "preferiti" => Self::Preferences,
            "stats" => Self::Stats,
            "today" | "oggi" => Self::Today,
            "search" | "cerca" => {
                Self::Search((!rest.is_empty()).then(|| rest.to_string()))
            }
            "h2h" => Self::HeadToHead(parse_team_pair(rest)),
            "notifications" | "notify" => Self::Notifications(parse_toggle(rest)),
            "favorites" => Self::Favorites,
            _ => Self::Unknown,
        }
    }
}

fn parse_team_pair(args: &str) -> Option<(u32, u32)> {
    let mut parts = args.split_whitespace();
    let first = parts.next()?.parse().ok()?;
    let second = parts.next()?.parse().ok()?;
    if parts.next().is_some() || first == second {
        return None;
    }
    Some((first, second))
}

fn parse_toggle(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Some(true),
        "off" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Data attached to an inline keyboard button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    League(LeagueCode),
    Standings(LeagueCode),
    Matches(LeagueCode),
    TopScorers(LeagueCode),
    Team(u32),
    AddFavorite(u32),
    RemoveFavorite(u32),
    BackToLeagues,
    BackToTeams,
}

impl Callback {
    /// Wire form sent to Telegram as `callback_data`.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::League(code) => format!("league_{code}"),
            Self::Standings(code) => format!("standings_{code}"),
            Self::Matches(code) => format!("matches_{code}"),
            Self::TopScorers(code) => format!("topscorers_{code}"),
            Self::Team(id) => format!("team_{id}"),
            Self::AddFavorite(id) => format!("fav_{id}"),
            Self::RemoveFavorite(id) => format!("unfav_{id}"),
            Self::BackToLeagues => "back_leagues".to_string(),
            Self::BackToTeams => "back_teams".to_string(),
        }
    }

    /// Decodes `callback_data`; unknown or malformed data yields `None`.
    #[must_use]
    pub fn decode(data: &str) -> Option<Self> {
        match data {
            "back_leagues" => return Some(Self::BackToLeagues),
            "back_teams" => return Some(Self::BackToTeams),
            _ => {}
        }

        let (prefix, arg) = data.split_once('_')?;
        match prefix {
            "league" => arg.parse().ok().map(Self::League),
            "standings" => arg.parse().ok().map(Self::Standings),
            "matches" => arg.parse().ok().map(Self::Matches),
            "topscorers" => arg.parse().ok().map(Self::TopScorers),
            "team" => arg.parse().ok().map(Self::Team),
            "fav" => arg.parse().ok().map(Self::AddFavorite),
            "unfav" => arg.parse().ok().map(Self::RemoveFavorite),
            _ => None,
        }
    }
}
