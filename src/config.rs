//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` (optional, every field has a default) and
//! deserializes into strongly-typed structs. Secrets are referenced by
//! env-var name in the config and resolved at startup into
//! [`Credentials`].

use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub watchlist: WatchlistConfig,
    pub filter: FilterConfig,
    pub finnhub: FinnhubConfig,
    pub telegram: TelegramConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    /// Sleep between completed cycles.
    pub poll_interval_secs: u64,
    /// Shorter sleep after a cycle that failed outright.
    pub error_cooldown_secs: u64,
    /// Pause after each delivered message.
    pub message_delay_ms: u64,
    /// Pause after each per-symbol fetch.
    pub fetch_delay_ms: u64,
    /// Width of the per-symbol date window, in calendar days.
    pub lookback_days: u32,
    pub announce_startup: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 300,
            error_cooldown_secs: 60,
            message_delay_ms: 1000,
            fetch_delay_ms: 1000,
            lookback_days: 1,
            announce_startup: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WatchlistConfig {
    pub symbols: Vec<String>,
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            symbols: ["MSFT", "ORCL", "META", "AMZN", "ALAB", "NBIS", "LAES", "BBAI"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FilterConfig {
    pub keywords: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "artificial intelligence", "AI", "machine learning", "deep learning",
                "neural network", "LLM", "generative AI", "ChatGPT", "OpenAI",
                "semiconductor", "chip", "GPU", "NVIDIA", "processor", "AI accelerator",
                "data center", "cloud computing", "AI infrastructure", "TPU",
                "space", "satellite", "rocket", "SpaceX", "aerospace",
                "robotics", "autonomous", "automation", "robot",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FinnhubConfig {
    pub api_key_env: String,
    pub base_url: Option<String>,
    /// General-feed category.
    pub category: String,
    pub timeout_secs: u64,
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            api_key_env: "FINNHUB_API_KEY".to_string(),
            base_url: None,
            category: "technology".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token_env: String,
    pub chat_id_env: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub disable_web_page_preview: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
            base_url: None,
            timeout_secs: 10,
            disable_web_page_preview: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub seen_file: String,
    /// Cap on persisted identifiers; oldest are evicted first.
    pub max_entries: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seen_file: crate::storage::DEFAULT_SEEN_FILE.to_string(),
            max_entries: crate::storage::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    /// A present but invalid file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the cycle engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.bot.poll_interval_secs == 0 {
            bail!("bot.poll_interval_secs must be greater than zero");
        }
        if self.storage.max_entries == 0 {
            bail!("storage.max_entries must be greater than zero");
        }
        if let Some(i) = self.filter.keywords.iter().position(|k| k.trim().is_empty()) {
            bail!("filter.keywords[{i}] is empty; an empty keyword would match every article");
        }
        if let Some(i) = self.watchlist.symbols.iter().position(|s| s.trim().is_empty()) {
            bail!("watchlist.symbols[{i}] is empty");
        }
        if self.finnhub.category.trim().is_empty() {
            bail!("finnhub.category must not be empty");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.bot.poll_interval_secs)
    }

    pub fn error_cooldown(&self) -> Duration {
        Duration::from_secs(self.bot.error_cooldown_secs)
    }

    /// Resolve an environment variable name to its value.
    /// Unset and blank values are both reported as missing.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        match std::env::var(env_name) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => bail!("Environment variable not set: {env_name} (export it or add it to .env)"),
        }
    }
}

/// Secrets resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub finnhub_api_key: SecretString,
    pub telegram_bot_token: SecretString,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Resolve every secret the config references. Fails on the first
    /// missing variable, naming it.
    pub fn from_env(cfg: &AppConfig) -> Result<Self> {
        Ok(Self {
            finnhub_api_key: SecretString::new(AppConfig::resolve_env(&cfg.finnhub.api_key_env)?),
            telegram_bot_token: SecretString::new(AppConfig::resolve_env(
                &cfg.telegram.bot_token_env,
            )?),
            telegram_chat_id: AppConfig::resolve_env(&cfg.telegram.chat_id_env)?,
        })
    }
}
