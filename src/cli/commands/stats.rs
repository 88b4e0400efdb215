use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config, top: u64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let users = store.total_users().await?;
    let queries = store.total_queries().await?;
    let cached = store.cache_entry_count().await?;
    let top_parameters = store.top_parameters(top).await?;
    store.close().await?;

    println!("ScoreBot statistics");
    println!("{:-<40}", "");
    println!("Users:          {users}");
    println!("Queries logged: {queries}");
    println!("Cache entries:  {cached}");

    if !top_parameters.is_empty() {
        println!();
        println!("Most queried:");
        for (parameter, hits) in top_parameters {
            println!("  {parameter:<20} {hits}");
        }
    }

    Ok(())
}
