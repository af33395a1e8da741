//! Where the Telegram credentials come from.
//!
//! Each credential is taken from its environment variable when set, and
//! from a [`SecretStore`] otherwise. The production store is the system
//! [`Keychain`]; `whalewatch --store-credentials` fills it from the
//! environment so later runs can start with a clean environment.

use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Keychain service name used for all stored credentials.
const SERVICE: &str = "whalewatch";

/// Credentials needed to deliver alerts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKey {
    TelegramBotToken,
    TelegramChatId,
}

impl CredentialKey {
    /// All credential keys.
    pub const ALL: [CredentialKey; 2] = [Self::TelegramBotToken, Self::TelegramChatId];

    /// Returns the keychain entry identifier.
    pub fn keyring_id(self) -> &'static str {
        match self {
            Self::TelegramBotToken => "telegram_bot_token",
            Self::TelegramChatId => "telegram_chat_id",
        }
    }

    /// Returns the environment variable that overrides the stored value.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::TelegramBotToken => "TELEGRAM_BOT_TOKEN",
            Self::TelegramChatId => "TELEGRAM_CHAT_ID",
        }
    }
}

/// Fallback lookup for credentials missing from the environment.
pub trait SecretStore {
    /// Returns the stored value for `key`, or `None` if there is none.
    fn get(&self, key: CredentialKey) -> Option<Zeroizing<String>>;
}

/// The operating system keychain.
#[derive(Debug, Default, Clone, Copy)]
pub struct Keychain;

impl Keychain {
    fn entry(key: CredentialKey) -> crate::Result<keyring::Entry> {
        keyring::Entry::new(SERVICE, key.keyring_id())
            .map_err(|e| crate::WhalewatchError::Config(format!("keyring entry error: {e}")))
    }

    /// Saves `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`WhalewatchError::Config`](crate::WhalewatchError::Config) if
    /// the keychain is unavailable or rejects the write.
    pub fn store(&self, key: CredentialKey, value: &str) -> crate::Result<()> {
        Self::entry(key)?
            .set_password(value)
            .map_err(|e| crate::WhalewatchError::Config(format!("failed to save to keychain: {e}")))
    }
}

impl SecretStore for Keychain {
    fn get(&self, key: CredentialKey) -> Option<Zeroizing<String>> {
        let entry = Self::entry(key).ok()?;
        match entry.get_password() {
            Ok(password) => Some(Zeroizing::new(password)),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(key = key.keyring_id(), error = %e, "failed to read keychain entry");
                None
            }
        }
    }
}

/// Resolves `key` from the environment, falling back to `store`.
pub fn resolve(key: CredentialKey, store: &impl SecretStore) -> Option<Zeroizing<String>> {
    choose(key, std::env::var(key.env_var()).ok(), store)
}

/// A non-empty environment value wins; the store is only consulted
/// without one.
fn choose(
    key: CredentialKey,
    from_env: Option<String>,
    store: &impl SecretStore,
) -> Option<Zeroizing<String>> {
    if let Some(value) = from_env.filter(|v| !v.is_empty()) {
        return Some(Zeroizing::new(value));
    }
    let value = store.get(key).filter(|v| !v.is_empty())?;
    debug!(key = key.env_var(), "using credential from keychain");
    Some(value)
}

#[cfg(test)]
impl SecretStore for std::collections::HashMap<CredentialKey, &'static str> {
    fn get(&self, key: CredentialKey) -> Option<Zeroizing<String>> {
        self.get(&key).map(|v| Zeroizing::new((*v).to_string()))
    }
}
