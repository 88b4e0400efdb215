pub mod prelude;

pub mod api_cache;
pub mod favorite_teams;
pub mod query_history;
pub mod users;
