use crate::constants::cache as ttl;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable that overrides `telegram.bot_token`.
pub const BOT_TOKEN_ENV: &str = "BOT_TOKEN";

/// Environment variable that overrides `football.api_key`.
pub const FOOTBALL_API_KEY_ENV: &str = "FOOTBALL_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub telegram: TelegramConfig,

    pub football: FootballConfig,

    pub cache: CacheConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Tokio worker threads; 0 means one per core.
    pub worker_threads: usize,

    /// SQLite has a single writer, so one connection is the default.
    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/scorebot.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 1,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,

    pub api_base_url: String,

    /// Long-poll window passed to `getUpdates`.
    pub poll_timeout_seconds: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: "https://api.telegram.org".to_string(),
            poll_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FootballConfig {
    pub api_key: String,

    pub base_url: String,

    pub request_timeout_seconds: u64,
}

impl Default for FootballConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.football-data.org/v4".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Sweep behaviour and per-artifact TTLs, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub sweep_on_startup: bool,

    pub standings: i64,

    pub matches: i64,

    pub top_scorers: i64,

    pub team: i64,

    pub today: i64,

    pub head_to_head: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_on_startup: true,
            standings: ttl::STANDINGS_TTL_MINUTES,
            matches: ttl::MATCHES_TTL_MINUTES,
            top_scorers: ttl::TOP_SCORERS_TTL_MINUTES,
            team: ttl::TEAM_TTL_MINUTES,
            today: ttl::TODAY_TTL_MINUTES,
            head_to_head: ttl::HEAD_TO_HEAD_TTL_MINUTES,
        }
    }
}

impl CacheConfig {
    fn ttls(&self) -> [(&'static str, i64); 6] {
        [
            ("standings", self.standings),
            ("matches", self.matches),
            ("top_scorers", self.top_scorers),
            ("team", self.team),
            ("today", self.today),
            ("head_to_head", self.head_to_head),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,

    pub metrics_enabled: bool,

    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_port: 9000,
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets from the environment win over the file. Empty values are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(BOT_TOKEN_ENV) {
            self.telegram.bot_token = token;
        }
        if let Some(key) = non_empty(FOOTBALL_API_KEY_ENV) {
            self.football.api_key = key;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("scorebot").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scorebot").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.max_db_connections == 0 {
            anyhow::bail!("max_db_connections must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!(
                "min_db_connections ({}) cannot exceed max_db_connections ({})",
                self.general.min_db_connections,
                self.general.max_db_connections
            );
        }

        for (name, minutes) in self.cache.ttls() {
            if minutes <= 0 {
                anyhow::bail!("cache.{name} TTL must be > 0 minutes");
            }
            if minutes > ttl::MAX_TTL_MINUTES {
                anyhow::bail!(
                    "cache.{name} TTL must be at most {} minutes",
                    ttl::MAX_TTL_MINUTES
                );
            }
        }

        Ok(())
    }

    /// Extra checks needed only when the bot itself runs.
    pub fn validate_for_bot(&self) -> Result<()> {
        self.validate()?;

        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!(
                "Telegram bot token is missing: set telegram.bot_token or {BOT_TOKEN_ENV}"
            );
        }

        Ok(())
    }
}
