use crate::config::Config;
use crate::db::Store;
use crate::domain::UserId;
use crate::services::usage::{UsageLog, render_entry};

pub async fn cmd_history(config: &Config, user_id: i64, limit: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let user_id = UserId::new(user_id);
    let usage = UsageLog::new(store.clone());

    let entries = usage.recent(user_id, limit).await;
    let favorite = usage.most_frequent_category(user_id).await;
    store.close().await?;

    if entries.is_empty() {
        println!("No queries recorded for user {user_id}.");
        return Ok(());
    }

    println!("Recent queries for user {user_id} (last {}):", entries.len());
    println!("{:-<60}", "");
    for entry in &entries {
        println!("• {}", render_entry(entry));
    }

    if let Some(favorite) = favorite {
        println!();
        println!("Most queried: {favorite}");
    }

    Ok(())
}
