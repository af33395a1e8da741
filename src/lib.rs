//! Whales Market best-order monitor.
//!
//! Polls pre-market offers for a set of trading pairs, normalizes prices
//! (including the compact subscript-zero notation), keeps the best BUY and
//! SELL order per pair between cycles, and sends an alert when one of them
//! changes.

pub mod alert;
pub mod config;
pub mod credentials;
pub mod diff;
pub mod error;
pub mod market;
pub mod models;
pub mod monitor;
pub mod normalize;
pub mod notify;
pub mod price;
pub mod select;

pub use error::{Result, WhalewatchError};
