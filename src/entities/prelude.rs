pub use super::api_cache::Entity as ApiCache;
pub use super::favorite_teams::Entity as FavoriteTeams;
pub use super::query_history::Entity as QueryHistory;
pub use super::users::Entity as Users;
