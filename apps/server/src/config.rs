//! Application configuration, read from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use witwhalert_alerts::RateLimitConfig;
use witwhalert_core::AlertTiers;
use witwhalert_engine::SyncConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key}={value} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Failed to read tiers from {path}: {reason}")]
    TiersFile { path: PathBuf, reason: String },
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub explorer: ExplorerSettings,
    pub sync: SyncSettings,
    /// JSON tier table; built-in table when unset.
    pub tiers_path: Option<PathBuf>,
    /// JSON address -> label table; enrichment disabled when unset.
    pub known_wallets_path: Option<PathBuf>,
    pub twitter: TwitterSettings,
    pub telegram: TelegramSettings,
}

/// Explorer endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerSettings {
    /// REST API root.
    pub api_url: String,
    /// Web root used for alert links.
    pub web_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            api_url: "https://witnet.network/api".to_string(),
            web_url: "https://witnet.network".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ExplorerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Sync loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    pub poll_secs_interval: u64,
    pub block_pacing_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_secs_interval: 30,
            block_pacing_secs: 5,
        }
    }
}

impl From<&SyncSettings> for SyncConfig {
    fn from(settings: &SyncSettings) -> Self {
        SyncConfig::new(
            Duration::from_secs(settings.poll_secs_interval),
            Duration::from_secs(settings.block_pacing_secs),
        )
    }
}

/// Twitter channel settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TwitterSettings {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    pub rate_limit: RateLimitConfig,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            access_token: None,
            rate_limit: RateLimitConfig::twitter(),
        }
    }
}

impl std::fmt::Debug for TwitterSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterSettings")
            .field("enabled", &self.enabled)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Telegram channel settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    pub enabled: bool,
    #[serde(skip_serializing)]
    pub bot_token: Option<String>,
    pub chat_id: Option<i64>,
    pub rate_limit: RateLimitConfig,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: None,
            chat_id: None,
            rate_limit: RateLimitConfig::telegram(),
        }
    }
}

impl std::fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("enabled", &self.enabled)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("chat_id", &self.chat_id)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Env values are strings; only these spellings mean yes.
fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "yes" | "y" | "1")
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(value) => match value.trim().parse::<T>() {
                Ok(parsed) => Ok(parsed),
                Err(e) => Err(ConfigError::Invalid {
                    key,
                    reason: e.to_string(),
                    value,
                }),
            },
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).map(|v| parse_flag(&v)).unwrap_or(false)
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env { lookup };
        let defaults = AppConfig::default();

        let explorer = ExplorerSettings {
            api_url: env.get("EXPLORER_API_URL").unwrap_or(defaults.explorer.api_url),
            web_url: env.get("EXPLORER_WEB_URL").unwrap_or(defaults.explorer.web_url),
            request_timeout_secs: env.parse(
                "REQUEST_TIMEOUT_SECS",
                defaults.explorer.request_timeout_secs,
            )?,
        };

        let sync = SyncSettings {
            poll_secs_interval: env.parse("POLL_SECS_INTERVAL", defaults.sync.poll_secs_interval)?,
            block_pacing_secs: env.parse("BLOCK_PACING_SECS", defaults.sync.block_pacing_secs)?,
        };
        if sync.poll_secs_interval == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_SECS_INTERVAL",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let twitter = TwitterSettings {
            enabled: env.flag("ENABLE_TWEETS"),
            access_token: env.get("TWITTER_BEARER_TOKEN"),
            rate_limit: RateLimitConfig::new(
                env.parse("TWITTER_RATE_LIMIT_CALLS", defaults.twitter.rate_limit.max_calls)?,
                env.parse(
                    "TWITTER_RATE_LIMIT_PERIOD_SECS",
                    defaults.twitter.rate_limit.period_secs,
                )?,
            ),
        };
        if twitter.enabled && twitter.access_token.is_none() {
            return Err(ConfigError::Missing("TWITTER_BEARER_TOKEN"));
        }

        let telegram = TelegramSettings {
            enabled: env.flag("ENABLE_TELEGRAM"),
            bot_token: env.get("TELEGRAM_BOT_TOKEN"),
            chat_id: env
                .get("TELEGRAM_CHAT_ID")
                .map(|value| match value.trim().parse::<i64>() {
                    Ok(id) => Ok(id),
                    Err(e) => Err(ConfigError::Invalid {
                        key: "TELEGRAM_CHAT_ID",
                        reason: e.to_string(),
                        value,
                    }),
                })
                .transpose()?,
            rate_limit: RateLimitConfig::new(
                env.parse("TELEGRAM_RATE_LIMIT_CALLS", defaults.telegram.rate_limit.max_calls)?,
                env.parse(
                    "TELEGRAM_RATE_LIMIT_PERIOD_SECS",
                    defaults.telegram.rate_limit.period_secs,
                )?,
            ),
        };
        if telegram.enabled {
            if telegram.bot_token.is_none() {
                return Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"));
            }
            if telegram.chat_id.is_none() {
                return Err(ConfigError::Missing("TELEGRAM_CHAT_ID"));
            }
        }

        Ok(Self {
            explorer,
            sync,
            tiers_path: env.get("TIERS_PATH").map(PathBuf::from),
            known_wallets_path: env.get("KNOWN_WALLETS_PATH").map(PathBuf::from),
            twitter,
            telegram,
        })
    }

    /// Tier table from `tiers_path`, or the built-in one.
    pub fn load_tiers(&self) -> Result<AlertTiers, ConfigError> {
        match &self.tiers_path {
            None => Ok(AlertTiers::default()),
            Some(path) => load_tiers_file(path),
        }
    }
}

fn load_tiers_file(path: &Path) -> Result<AlertTiers, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::TiersFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::TiersFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
