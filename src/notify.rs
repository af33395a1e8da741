//! Alert delivery.
//!
//! Delivery is best-effort: senders report success as a `bool` and never
//! return errors, so a failed alert cannot stall the poll loop.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::Result;

/// Per-request timeout for the Bot API.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for alert messages.
pub trait AlertSink {
    /// Sends one message; returns `true` if it was delivered.
    fn send(&self, text: &str) -> impl Future<Output = bool> + Send;
}

/// `sendMessage` request body.
#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Sends alerts through the Telegram Bot API.
pub struct TelegramNotifier {
    http: reqwest::Client,
    api_url: String,
    bot_token: Zeroizing<String>,
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier for the given bot and chat.
    ///
    /// # Errors
    ///
    /// Returns [`WhalewatchError::Http`](crate::WhalewatchError::Http) if the
    /// HTTP client cannot be built.
    pub fn new(api_url: &str, bot_token: &str, chat_id: &str) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            bot_token: Zeroizing::new(bot_token.to_string()),
            chat_id: chat_id.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token.as_str())
    }

    async fn try_send(&self, text: &str) -> Result<reqwest::Response> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };
        let response = self.http.post(self.endpoint()).json(&request).send().await?;
        Ok(response)
    }
}

impl AlertSink for TelegramNotifier {
    async fn send(&self, text: &str) -> bool {
        match self.try_send(text).await {
            Ok(response) if response.status() == reqwest::StatusCode::OK => {
                info!("Alert sent to Telegram");
                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!(%status, body = %body, "Telegram API rejected alert");
                false
            }
            Err(e) => {
                // reqwest errors can embed the URL, which carries the token.
                let e = e.to_string().replace(self.bot_token.as_str(), "<token>");
                error!(error = %e, "Telegram send failed");
                false
            }
        }
    }
}

/// Writes alerts to the log instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl AlertSink for LogNotifier {
    async fn send(&self, text: &str) -> bool {
        info!(alert = text, "Alert (no Telegram destination configured)");
        true
    }
}

/// The alert channel selected at startup.
pub enum Notifier {
    Telegram(TelegramNotifier),
    Log(LogNotifier),
}

impl AlertSink for Notifier {
    async fn send(&self, text: &str) -> bool {
        match self {
            Notifier::Telegram(n) => n.send(text).await,
            Notifier::Log(n) => n.send(text).await,
        }
    }
}
