pub mod cache;
pub use cache::{Clock, ResponseCache, SystemClock};

pub mod football;
pub use football::{FootballFeed, FootballService, FootballSource};

pub mod preferences;
pub use preferences::PreferenceService;

pub mod usage;
pub use usage::UsageLog;
