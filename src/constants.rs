pub mod cache {
    //! Default time-to-live per cached artifact, in minutes.

    pub const STANDINGS_TTL_MINUTES: i64 = 30;

    pub const MATCHES_TTL_MINUTES: i64 = 10;

    pub const TOP_SCORERS_TTL_MINUTES: i64 = 60;

    pub const TEAM_TTL_MINUTES: i64 = 120;

    pub const TODAY_TTL_MINUTES: i64 = 5;

    /// Finished meetings never change, so a day is safe.
    pub const HEAD_TO_HEAD_TTL_MINUTES: i64 = 1440;

    pub const TODAY_KEY: &str = "matches_today";

    /// Longest accepted TTL: one year.
    pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;
}

pub mod limits {

    pub const STANDINGS_ROWS: usize = 20;

    pub const SCHEDULED_MATCHES: usize = 10;

    pub const TOP_SCORERS: usize = 15;

    pub const PLAYER_RESULTS: usize = 10;

    pub const TODAY_MATCHES: usize = 20;

    pub const HEAD_TO_HEAD_MEETINGS: usize = 10;

    /// Entries shown by `/stats`.
    pub const STATS_HISTORY: u64 = 5;

    pub const DEFAULT_HISTORY_LIMIT: u64 = 10;
}

pub mod intervals {
    use std::time::Duration;

    /// Pause after a failed `getUpdates` before polling again.
    pub const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);
}
