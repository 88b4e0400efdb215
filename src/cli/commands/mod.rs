mod cache;
mod history;
mod stats;

pub use cache::{cmd_clear_cache, cmd_sweep};
pub use history::cmd_history;
pub use stats::cmd_stats;
