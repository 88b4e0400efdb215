pub mod bot;
pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod services;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use bot::Bot;
use cli::{Cli, Commands};
use clients::football::FootballDataClient;
use clients::telegram::TelegramClient;
pub use config::Config;
use config::LogFormat;
use db::Store;
use services::cache::ResponseCache;
use services::football::FootballService;
use services::preferences::PreferenceService;
use services::usage::UsageLog;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub async fn run(config: Config, cli: Cli) -> anyhow::Result<()> {
    init_tracing(&config);

    let metrics_enabled = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!(port = config.observability.metrics_port, "Prometheus exporter listening");
        true
    } else {
        false
    };

    match cli.command() {
        Commands::Run => {
            config.validate_for_bot()?;
            run_bot(config, metrics_enabled).await
        }
        Commands::Sweep => {
            config.validate()?;
            cli::commands::cmd_sweep(&config).await
        }
        Commands::ClearCache => {
            config.validate()?;
            cli::commands::cmd_clear_cache(&config).await
        }
        Commands::Stats { top } => {
            config.validate()?;
            cli::commands::cmd_stats(&config, *top).await
        }
        Commands::History { user_id, limit } => {
            config.validate()?;
            cli::commands::cmd_history(&config, *user_id, *limit).await
        }
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.observability.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run_bot(config: Config, metrics_enabled: bool) -> anyhow::Result<()> {
    info!("Starting ScoreBot...");

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let cache = ResponseCache::new(store.clone());
    if config.cache.sweep_on_startup {
        cache.sweep_expired().await;
    }

    if config.football.api_key.is_empty() {
        warn!("Football API key is not configured; data commands will answer with errors");
    }

    let feed = Arc::new(FootballDataClient::new(&config.football)?);
    let football = Arc::new(FootballService::new(feed, cache, config.cache.clone()));
    let bot = Bot::new(
        football,
        PreferenceService::new(store.clone()),
        UsageLog::new(store.clone()),
    );

    let telegram = TelegramClient::new(&config.telegram)?;
    let me = telegram
        .get_me()
        .await
        .context("Failed to reach Telegram with the configured bot token")?;
    info!(
        username = me.username.as_deref().unwrap_or("unknown"),
        metrics_enabled, "Bot is online. Press Ctrl+C to stop."
    );

    tokio::select! {
        () = poll_updates(&telegram, &bot) => {}
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for shutdown signal: {e}");
            }
            info!("Shutdown signal received");
        }
    }

    store.close().await?;
    info!("Goodbye");
    Ok(())
}

/// Pulls updates forever, handling them one at a time in arrival order.
async fn poll_updates(telegram: &TelegramClient, bot: &Bot) {
    let mut offset = None;

    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) if e.is_client_error() => {
                error!(error = %e, "Telegram rejected the poll request; check the bot token");
                tokio::time::sleep(constants::intervals::POLL_ERROR_BACKOFF).await;
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Polling Telegram failed");
                tokio::time::sleep(constants::intervals::POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(event) = update.into_event() else {
                continue;
            };

            if let bot::Event::Callback { query_id, .. } = &event
                && let Err(e) = telegram.answer_callback_query(query_id).await
            {
                warn!(error = %e, "Failed to answer callback query");
            }

            for reply in bot.handle(event).await {
                if let Err(e) = telegram.send(&reply).await {
                    warn!(chat_id = reply.chat_id, error = %e, "Failed to send message");
                }
            }
        }
    }
}
