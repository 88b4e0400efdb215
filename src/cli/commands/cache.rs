use crate::config::Config;
use crate::db::Store;
use crate::services::cache::ResponseCache;

pub async fn cmd_sweep(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let removed = ResponseCache::new(store.clone()).sweep_expired().await;
    let remaining = store.cache_entry_count().await?;
    store.close().await?;

    println!("Removed {removed} expired cache entries ({remaining} still live).");
    Ok(())
}

pub async fn cmd_clear_cache(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let removed = ResponseCache::new(store.clone()).clear_all().await;
    store.close().await?;

    println!("Cleared {removed} cache entries.");
    Ok(())
}
