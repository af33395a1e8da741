//! Shared models for Whales Market offers and monitor output.
//!
//! Contains the order side definition plus the raw (wire) and canonical
//! order types passed between the pipeline stages.

pub mod offer;
pub mod order;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Both sides in the order they are polled.
    pub const ALL: [Side; 2] = [Side::Buy, Side::Sell];

    /// Returns the wire-format name expected by the offers API.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }

    /// Returns the upper-case label used in alerts and logs.
    pub fn label(self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Returns the colored marker shown next to the side label.
    pub fn marker(self) -> &'static str {
        match self {
            Side::Buy => "🟢",
            Side::Sell => "🔴",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
