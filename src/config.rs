//! Application configuration loaded from environment variables and a
//! pairs file.
//!
//! Environment variables:
//! - `WHALES_API_URL`: offers endpoint (default `https://api.whales.market/v2/offers`)
//! - `WHALES_PAIRS_FILE`: JSON file with the monitored pairs (default `pairs.json`)
//! - `WHALES_POLL_INTERVAL_SECS`: seconds between cycles (default 10)
//! - `WHALES_LOG_FILE`: optional log file, in addition to stderr
//! - `TELEGRAM_API_URL`: Bot API base URL (default `https://api.telegram.org`)
//! - `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`: alert destination; both or neither.
//!   Either may instead come from the keychain (see [`crate::credentials`]).
//!
//! The pairs file maps each symbol to its chain id and display glyph:
//!
//! ```json
//! { "TEA": { "chain": "1", "emoji": "🍵" }, "ZKP": { "chain": 1 } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

use crate::credentials::{self, CredentialKey, SecretStore};

/// Default offers endpoint.
const DEFAULT_API_URL: &str = "https://api.whales.market/v2/offers";

/// Default Telegram Bot API base URL.
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Default pairs file, relative to the working directory.
const DEFAULT_PAIRS_FILE: &str = "pairs.json";

/// Default seconds between polling cycles.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub telegram: TelegramConfig,
    pub pairs: PairsConfig,
    pub log_file: Option<PathBuf>,
}

/// Offers API configuration values.
#[derive(Debug)]
pub struct MarketConfig {
    pub api_url: String,
    pub poll_interval: Duration,
}

/// Telegram alert channel configuration values.
#[derive(Debug)]
pub struct TelegramConfig {
    pub api_url: String,
    /// `None` sends alerts to the log instead.
    pub destination: Option<TelegramDestination>,
}

/// Bot credentials and target chat.
pub struct TelegramDestination {
    pub bot_token: Zeroizing<String>,
    pub chat_id: String,
}

impl fmt::Debug for TelegramDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramDestination")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Display and routing metadata for one trading pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairConfig {
    /// Chain id passed to the offers API.
    #[serde(deserialize_with = "string_or_number")]
    pub chain: String,
    /// Glyph shown in front of the symbol in alerts.
    #[serde(default)]
    pub emoji: String,
}

/// Monitored pairs keyed by symbol, iterated in symbol order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PairsConfig {
    pub pairs: BTreeMap<String, PairConfig>,
}

impl PairsConfig {
    /// Loads the pairs from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or is empty.
    pub fn load(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::WhalewatchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_json(&contents)
    }

    /// Parses the pairs from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or defines no pairs.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.pairs.is_empty() {
            return Err(crate::WhalewatchError::Config(
                "no trading pairs configured".to_string(),
            ));
        }
        Ok(config)
    }

    /// Returns the configuration for `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&PairConfig> {
        self.pairs.get(symbol)
    }

    /// Returns the display glyph for `symbol`, empty if unknown.
    pub fn emoji(&self, symbol: &str) -> &str {
        self.get(symbol).map(|p| p.emoji.as_str()).unwrap_or("")
    }

    /// Iterates over `(symbol, config)` in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PairConfig)> {
        self.pairs.iter()
    }

    /// Returns the monitored symbols joined with `", "`.
    pub fn symbols(&self) -> String {
        self.pairs.keys().cloned().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Loads the application configuration from environment variables,
/// taking Telegram credentials missing from the environment from `secrets`.
///
/// # Errors
///
/// Returns [`WhalewatchError::Config`](crate::WhalewatchError::Config) if
/// only one of the Telegram credentials is available, the poll interval is
/// not a positive integer, or the pairs file cannot be loaded.
pub fn fetch_config(secrets: &impl SecretStore) -> crate::Result<AppConfig> {
    let api_url = non_empty_var("WHALES_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let telegram_api_url = non_empty_var("TELEGRAM_API_URL")
        .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());

    let poll_interval = match non_empty_var("WHALES_POLL_INTERVAL_SECS") {
        Some(raw) => parse_interval(&raw)?,
        None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
    };

    let bot_token = credentials::resolve(CredentialKey::TelegramBotToken, secrets);
    let chat_id = credentials::resolve(CredentialKey::TelegramChatId, secrets);

    let destination = match (bot_token, chat_id) {
        (Some(bot_token), Some(chat_id)) => Some(TelegramDestination {
            bot_token,
            chat_id: chat_id.to_string(),
        }),
        (Some(_), None) => {
            return Err(crate::WhalewatchError::Config(
                "TELEGRAM_BOT_TOKEN is set but TELEGRAM_CHAT_ID is missing".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(crate::WhalewatchError::Config(
                "TELEGRAM_CHAT_ID is set but TELEGRAM_BOT_TOKEN is missing".to_string(),
            ));
        }
        (None, None) => None,
    };

    let pairs_file = non_empty_var("WHALES_PAIRS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PAIRS_FILE));
    let pairs = PairsConfig::load(&pairs_file)?;

    Ok(AppConfig {
        market: MarketConfig {
            api_url,
            poll_interval,
        },
        telegram: TelegramConfig {
            api_url: telegram_api_url,
            destination,
        },
        pairs,
        log_file: non_empty_var("WHALES_LOG_FILE").map(PathBuf::from),
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_interval(raw: &str) -> crate::Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(crate::WhalewatchError::Config(format!(
            "WHALES_POLL_INTERVAL_SECS must be a positive integer, got {raw:?}"
        ))),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}
