//! Shared test doubles for the offers source and alert sink.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use whalewatch::config::{PairConfig, PairsConfig};
use whalewatch::models::Side;
use whalewatch::Result;
use whalewatch::market::OrderSource;
use whalewatch::models::offer::{RawNumber, RawOrder};
use whalewatch::notify::AlertSink;

/// One scripted fetch result.
pub enum Reply {
    Orders(Vec<RawOrder>),
    /// Orders returned only after the given delay.
    Delayed(Duration, Vec<RawOrder>),
    /// An undecodable response body.
    Fail,
}

/// Order source that replays scripted replies per (symbol, side).
///
/// An exhausted script answers with an empty list.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<(String, Side), VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Side)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for the next fetch of `symbol` on `side`.
    pub fn push(&self, symbol: &str, side: Side, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry((symbol.to_string(), side))
            .or_default()
            .push_back(reply);
    }

    /// Fetches made so far, in order.
    pub fn calls(&self) -> Vec<(String, Side)> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, symbol: &str, side: Side) -> Option<Reply> {
        self.calls.lock().unwrap().push((symbol.to_string(), side));
        self.replies
            .lock()
            .unwrap()
            .get_mut(&(symbol.to_string(), side))
            .and_then(VecDeque::pop_front)
    }
}

impl OrderSource for ScriptedSource {
    async fn fetch_orders(
        &self,
        symbol: &str,
        _pair: &PairConfig,
        side: Side,
    ) -> Result<Vec<RawOrder>> {
        match self.next(symbol, side) {
            Some(Reply::Orders(orders)) => Ok(orders),
            Some(Reply::Delayed(delay, orders)) => {
                tokio::time::sleep(delay).await;
                Ok(orders)
            }
            Some(Reply::Fail) => {
                Err(serde_json::from_str::<serde_json::Value>("<html>502</html>")
                    .unwrap_err()
                    .into())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Alert sink that records every message.
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    deliver: bool,
}

impl RecordingSink {
    pub fn delivering() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deliver: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            deliver: false,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    async fn send(&self, text: &str) -> bool {
        self.sent.lock().unwrap().push(text.to_string());
        self.deliver
    }
}

/// Pairs used across the monitor tests.
pub fn pairs() -> PairsConfig {
    PairsConfig::from_json(
        r#"{"TEA": {"chain": "1", "emoji": "🍵"}, "ZKP": {"chain": "1", "emoji": "🔐"}}"#,
    )
    .unwrap()
}

/// A readable offer; price and collateral may be decimals or raw strings.
pub fn offer(id: &str, price: impl Into<RawNumber>, collateral: impl Into<RawNumber>) -> RawOrder {
    RawOrder::offer(id, price, collateral)
}
