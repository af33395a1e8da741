//! Canonical order values produced by the normalization pipeline.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Side;

/// A normalized offer.
///
/// `amount` is derived: `collateral / price` when `price > 0`, otherwise
/// zero. Values are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: Option<String>,
    pub side: Side,
    pub price: Decimal,
    pub amount: Decimal,
    pub collateral: Decimal,
    pub symbol: String,
}

impl Order {
    /// Returns `true` if the order has a positive price and amount.
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO && self.amount > Decimal::ZERO
    }
}

/// Best BUY and SELL orders recorded for one trading pair in one cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PairSnapshot {
    pub buy: Option<Order>,
    pub sell: Option<Order>,
}

impl PairSnapshot {
    /// Returns the best order for `side`, if any.
    pub fn side(&self, side: Side) -> Option<&Order> {
        match side {
            Side::Buy => self.buy.as_ref(),
            Side::Sell => self.sell.as_ref(),
        }
    }

    /// Returns `true` if neither side has an order.
    pub fn is_empty(&self) -> bool {
        self.buy.is_none() && self.sell.is_none()
    }

    /// Iterates over the present orders, BUY first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.buy.iter().chain(self.sell.iter())
    }
}

/// A side of a pair whose best order changed between two cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    pub symbol: String,
    pub side: Side,
    /// Best order this cycle; `None` when the side disappeared.
    pub current: Option<Order>,
    /// Best order in the previous cycle; `None` when the side is new.
    pub previous: Option<Order>,
}

impl OrderChange {
    /// Returns `true` if the side had no order this cycle.
    pub fn is_disappearance(&self) -> bool {
        self.current.is_none()
    }
}
