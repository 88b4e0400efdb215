//! CLI module - Command-line interface for ScoreBot
//!
//! Running without a subcommand starts the bot.

pub mod commands;

use clap::{Parser, Subcommand};

/// ScoreBot - football data on Telegram
#[derive(Parser)]
#[command(name = "scorebot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (long polling)
    #[command(alias = "daemon")]
    Run,

    /// Delete expired cache entries
    Sweep,

    /// Delete every cache entry
    #[command(name = "clear-cache")]
    ClearCache,

    /// Show usage statistics
    Stats {
        /// Number of top parameters to list
        #[arg(long, default_value_t = 5)]
        top: u64,
    },

    /// Show a user's query history
    #[command(alias = "h")]
    History {
        /// Telegram user id
        user_id: i64,
        /// Number of entries to show
        #[arg(long, default_value_t = crate::constants::limits::DEFAULT_HISTORY_LIMIT)]
        limit: u64,
    },

    /// Create default config file
    Init,
}

impl Cli {
    /// Subcommand to run, defaulting to the bot itself.
    #[must_use]
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_runs_the_bot() {
        let cli = Cli::parse_from(["scorebot"]);
        assert_eq!(cli.command(), &Commands::Run);
    }

    #[test]
    fn history_takes_user_and_limit() {
        let cli = Cli::parse_from(["scorebot", "history", "42", "--limit", "3"]);
        assert_eq!(
            cli.command(),
            &Commands::History {
                user_id: 42,
                limit: 3
            }
        );

        let cli = Cli::parse_from(["scorebot", "h", "7"]);
        assert_eq!(
            cli.command(),
            &Commands::History {
                user_id: 7,
                limit: 10
            }
        );
    }

    #[test]
    fn cache_maintenance_commands() {
        assert_eq!(
            Cli::parse_from(["scorebot", "clear-cache"]).command(),
            &Commands::ClearCache
        );
        assert_eq!(Cli::parse_from(["scorebot", "sweep"]).command(), &Commands::Sweep);
        assert_eq!(
            Cli::parse_from(["scorebot", "stats"]).command(),
            &Commands::Stats { top: 5 }
        );
    }
}
