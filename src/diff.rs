//! Change detection between consecutive cycles.

use crate::models::Side;
use crate::models::order::{Order, OrderChange, PairSnapshot};

/// Decides whether the best order of one side changed.
///
/// An order appearing or disappearing is a change. When both cycles have
/// an order, only price, amount and collateral are compared, exactly; a
/// different id with identical values is not a change.
pub fn has_changed(current: Option<&Order>, previous: Option<&Order>) -> bool {
    match (current, previous) {
        (None, None) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (Some(cur), Some(prev)) => {
            cur.price != prev.price || cur.amount != prev.amount || cur.collateral != prev.collateral
        }
    }
}

/// Compares both sides of a pair, BUY first.
///
/// `previous` is `None` for a pair not seen in the last cycle, which
/// behaves like an empty snapshot.
pub fn diff_pair(
    symbol: &str,
    current: &PairSnapshot,
    previous: Option<&PairSnapshot>,
) -> Vec<OrderChange> {
    Side::ALL
        .into_iter()
        .filter_map(|side| {
            let cur = current.side(side);
            let prev = previous.and_then(|p| p.side(side));
            has_changed(cur, prev).then(|| OrderChange {
                symbol: symbol.to_string(),
                side,
                current: cur.cloned(),
                previous: prev.cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> Order {
        Order {
            id: Some("o1".into()),
            side: Side::Buy,
            price: dec!(1.000000),
            amount: dec!(100),
            collateral: dec!(100),
            symbol: "TEA".into(),
        }
    }

    #[test]
    fn nothing_to_nothing_is_unchanged() {
        assert!(!has_changed(None, None));
    }

    #[test]
    fn appear_and_disappear_are_changes() {
        let o = sample();
        assert!(has_changed(Some(&o), None));
        assert!(has_changed(None, Some(&o)));
    }

    #[test]
    fn identical_values_are_unchanged() {
        let a = sample();
        let b = sample();
        assert!(!has_changed(Some(&a), Some(&b)));
    }

    #[test]
    fn id_alone_is_not_a_change() {
        let a = sample();
        let b = Order {
            id: Some("other".into()),
            ..sample()
        };
        assert!(!has_changed(Some(&a), Some(&b)));
    }

    #[test]
    fn trailing_zeros_are_not_a_change() {
        let a = sample();
        let b = Order {
            price: dec!(1),
            ..sample()
        };
        assert!(!has_changed(Some(&a), Some(&b)));
    }

    #[test]
    fn each_field_perturbation_is_a_change() {
        let base = sample();
        let perturbed = [
            Order {
                price: dec!(1.000001),
                ..sample()
            },
            Order {
                amount: dec!(101),
                ..sample()
            },
            Order {
                collateral: dec!(99.99),
                ..sample()
            },
        ];
        for p in &perturbed {
            assert!(has_changed(Some(p), Some(&base)));
            assert!(has_changed(Some(&base), Some(p)));
        }
    }

    #[test]
    fn diff_pair_reports_each_side() {
        let buy = sample();
        let sell = Order {
            side: Side::Sell,
            ..sample()
        };
        let previous = PairSnapshot {
            buy: Some(buy.clone()),
            sell: Some(sell.clone()),
        };
        let current = PairSnapshot {
            buy: Some(Order {
                collateral: dec!(150),
                amount: dec!(150),
                ..buy
            }),
            sell: None,
        };

        let changes = diff_pair("TEA", &current, Some(&previous));
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].side, Side::Buy);
        assert_eq!(changes[0].current.as_ref().unwrap().collateral, dec!(150));
        assert_eq!(changes[1].side, Side::Sell);
        assert!(changes[1].is_disappearance());
        assert_eq!(changes[1].previous, Some(sell));
    }

    #[test]
    fn unknown_pair_diffs_against_empty() {
        let current = PairSnapshot {
            buy: Some(sample()),
            sell: None,
        };
        let changes = diff_pair("TEA", &current, None);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].previous.is_none());

        assert!(diff_pair("TEA", &PairSnapshot::default(), None).is_empty());
    }
}
