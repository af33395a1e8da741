//! Best-order selection per side.
//!
//! BUY and SELL rank differently: the best bid is the highest price, while
//! the best ask is the largest collateral commitment. The offers feed is
//! already price-sorted, so for sells the interesting signal is size.

use crate::models::Side;
use crate::models::order::Order;

/// Picks the representative order for `side`.
///
/// Orders without a positive price and amount are ignored. On ties the
/// first order with the maximal key wins.
pub fn best_order(orders: &[Order], side: Side) -> Option<Order> {
    let mut best: Option<&Order> = None;
    for order in orders.iter().filter(|o| o.is_valid()) {
        let better = match best {
            None => true,
            Some(current) => match side {
                Side::Buy => order.price > current.price,
                Side::Sell => order.collateral > current.collateral,
            },
        };
        if better {
            best = Some(order);
        }
    }
    best.cloned()
}
