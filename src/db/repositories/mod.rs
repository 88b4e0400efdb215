pub mod cache;
pub mod favorite;
pub mod query_log;
pub mod user;
