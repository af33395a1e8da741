//! Poll loop and cross-cycle state.
//!
//! Each cycle walks the configured pairs in order, fetching BUY then SELL
//! offers, normalizing them, picking the best order per side, and diffing
//! against the snapshot kept from the previous cycle. The snapshot map is
//! then replaced wholesale, so a side that fails to fetch this cycle shows
//! up as "disappeared" and reappears as a change once fetching recovers.
//!
//! The first cycle with at least one successful fetch only primes the
//! state; alerts start from the cycle after it.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::alert::{self, CURRENT_ORDERS_TITLE, NEW_ORDERS_TITLE};
use crate::config::{PairConfig, PairsConfig};
use crate::diff::diff_pair;
use crate::market::OrderSource;
use crate::models::Side;
use crate::models::order::{Order, OrderChange, PairSnapshot};
use crate::normalize::normalize;
use crate::notify::AlertSink;
use crate::select::best_order;

/// Pause after a cycle in which every fetch failed.
pub const FAILURE_BACKOFF: Duration = Duration::from_secs(10);

/// State carried from one cycle to the next.
#[derive(Debug, Default)]
pub struct MonitorState {
    snapshots: BTreeMap<String, PairSnapshot>,
    /// Ids of every best order observed. Never pruned.
    seen_order_ids: HashSet<String>,
    primed: bool,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the snapshot recorded for `symbol` in the last cycle.
    pub fn snapshot(&self, symbol: &str) -> Option<&PairSnapshot> {
        self.snapshots.get(symbol)
    }

    /// Returns all snapshots from the last cycle.
    pub fn snapshots(&self) -> &BTreeMap<String, PairSnapshot> {
        &self.snapshots
    }

    /// Returns `true` once a cycle with a successful fetch has completed.
    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Returns `true` if an order with this id was ever a best order.
    pub fn has_seen(&self, id: &str) -> bool {
        self.seen_order_ids.contains(id)
    }

    /// Number of distinct best-order ids observed so far.
    pub fn seen_count(&self) -> usize {
        self.seen_order_ids.len()
    }

    /// Records the ids of a snapshot's orders; returns how many were new.
    fn observe(&mut self, snapshot: &PairSnapshot) -> usize {
        let mut new = 0;
        for id in snapshot.orders().filter_map(|o| o.id.as_ref()) {
            if self.seen_order_ids.insert(id.clone()) {
                debug!(id = %id, "new best order id");
                new += 1;
            }
        }
        new
    }
}

/// What happened during one cycle.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    /// Changes eligible for alerting. Always empty before priming.
    pub changes: Vec<OrderChange>,
    /// `true` for the cycle that primed the state.
    pub priming: bool,
    /// Fetch calls attempted (two per pair).
    pub fetches: usize,
    /// Fetch calls that failed and were treated as empty.
    pub failed_fetches: usize,
    /// Delivery result, or `None` if no alert was sent.
    pub alert_delivered: Option<bool>,
}

impl CycleOutcome {
    /// Returns `true` if every fetch in the cycle failed.
    pub fn is_degraded(&self) -> bool {
        self.fetches > 0 && self.failed_fetches == self.fetches
    }
}

/// Drives the fetch → normalize → select → diff pipeline.
pub struct MarketMonitor<S, A> {
    source: S,
    sink: A,
    pairs: PairsConfig,
    state: MonitorState,
}

impl<S: OrderSource, A: AlertSink> MarketMonitor<S, A> {
    /// Creates a monitor with empty state.
    #[must_use]
    pub fn new(source: S, sink: A, pairs: PairsConfig) -> Self {
        Self {
            source,
            sink,
            pairs,
            state: MonitorState::new(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    /// Runs one full cycle over all configured pairs.
    ///
    /// Never fails: fetch errors are logged and counted in the outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let mut outcome = CycleOutcome::default();
        let mut snapshots = BTreeMap::new();

        for (symbol, pair) in self.pairs.iter() {
            let mut snapshot = PairSnapshot::default();
            for side in Side::ALL {
                outcome.fetches += 1;
                let orders = match fetch_side(&self.source, symbol, pair, side).await {
                    Some(orders) => orders,
                    None => {
                        outcome.failed_fetches += 1;
                        Vec::new()
                    }
                };
                let best = best_order(&orders, side);
                debug_assert!(best.as_ref().is_none_or(|o| o.side == side));
                match side {
                    Side::Buy => snapshot.buy = best,
                    Side::Sell => snapshot.sell = best,
                }
            }

            outcome
                .changes
                .extend(diff_pair(symbol, &snapshot, self.state.snapshot(symbol)));
            self.state.observe(&snapshot);
            snapshots.insert(symbol.clone(), snapshot);
        }

        self.state.snapshots = snapshots;

        if !self.state.primed {
            outcome.changes.clear();
            if !outcome.is_degraded() {
                self.state.primed = true;
                outcome.priming = true;
                info!(pairs = self.pairs.len(), "Initial market snapshot recorded");
            }
            return outcome;
        }

        if outcome.changes.is_empty() {
            debug!("No order changes");
            return outcome;
        }

        info!(changes = outcome.changes.len(), "Order changes detected");
        match alert::render_changes(&outcome.changes, &self.pairs) {
            Some(text) => outcome.alert_delivered = Some(self.sink.send(&text).await),
            None => info!("Only disappeared orders this cycle; no alert sent"),
        }
        outcome
    }

    /// Polls until `shutdown` turns `true`.
    ///
    /// The flag is only checked between cycles, so a request raised while
    /// a cycle is running takes effect once that cycle has finished. A
    /// closed channel that never turned `true` is ignored.
    pub async fn run(&mut self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) {
        info!(
            pairs = %self.pairs.symbols(),
            interval_secs = poll_interval.as_secs(),
            "Monitoring started"
        );

        loop {
            let outcome = self.run_cycle().await;
            self.print_board(&outcome);

            let pause = if outcome.is_degraded() {
                error!(
                    failed = outcome.failed_fetches,
                    backoff_secs = FAILURE_BACKOFF.as_secs(),
                    "Every fetch failed this cycle"
                );
                FAILURE_BACKOFF
            } else {
                poll_interval
            };

            tokio::select! {
                Ok(_) = shutdown.wait_for(|stop| *stop) => {
                    info!("Monitor stopped");
                    break;
                }
                () = tokio::time::sleep(pause) => {}
            }
        }
    }

    fn print_board(&self, outcome: &CycleOutcome) {
        let title = if outcome.priming {
            CURRENT_ORDERS_TITLE
        } else if !outcome.changes.is_empty() {
            NEW_ORDERS_TITLE
        } else {
            return;
        };
        println!(
            "{}",
            alert::render_board(title, self.state.snapshots(), &self.pairs)
        );
        println!("⏰ Monitoring for order changes...");
    }
}

/// Fetches and normalizes one side; `None` if the fetch failed.
async fn fetch_side<S: OrderSource>(
    source: &S,
    symbol: &str,
    pair: &PairConfig,
    side: Side,
) -> Option<Vec<Order>> {
    let raw = match source.fetch_orders(symbol, pair, side).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(symbol, side = side.as_str(), error = %e, "Failed to fetch offers");
            return None;
        }
    };

    let orders = raw
        .iter()
        .filter_map(|record| {
            let order = normalize(record, side, symbol);
            if order.is_none() {
                debug!(symbol, side = side.as_str(), ?record, "Dropped unreadable offer");
            }
            order
        })
        .filter(Order::is_valid)
        .collect();
    Some(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(id: &str) -> Order {
        Order {
            id: Some(id.into()),
            side: Side::Buy,
            price: dec!(1),
            amount: dec!(1),
            collateral: dec!(1),
            symbol: "TEA".into(),
        }
    }

    #[test]
    fn observe_counts_new_ids_once() {
        let mut state = MonitorState::new();
        let snapshot = PairSnapshot {
            buy: Some(order("a")),
            sell: Some(order("b")),
        };
        assert_eq!(state.observe(&snapshot), 2);
        assert_eq!(state.observe(&snapshot), 0);
        assert!(state.has_seen("a"));
        assert!(!state.has_seen("c"));
        assert_eq!(state.seen_count(), 2);
    }

    #[test]
    fn orders_without_id_are_not_tracked() {
        let mut state = MonitorState::new();
        let snapshot = PairSnapshot {
            buy: Some(Order { id: None, ..order("x") }),
            sell: None,
        };
        assert_eq!(state.observe(&snapshot), 0);
        assert_eq!(state.seen_count(), 0);
    }

    #[test]
    fn degraded_only_when_every_fetch_failed() {
        let mut outcome = CycleOutcome {
            fetches: 4,
            failed_fetches: 3,
            ..CycleOutcome::default()
        };
        assert!(!outcome.is_degraded());
        outcome.failed_fetches = 4;
        assert!(outcome.is_degraded());
        assert!(!CycleOutcome::default().is_degraded());
    }
}
