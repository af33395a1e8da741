//! Conversion of raw offer records into canonical [`Order`] values.

use rust_decimal::Decimal;

use crate::models::Side;
use crate::models::offer::{RawNumber, RawOrder};
use crate::models::order::Order;
use crate::price::{parse_decimal, parse_price};

/// Builds an [`Order`] from a raw record.
///
/// Returns `None` only when the record cannot be read at all (not a JSON
/// object) or when `collateral / price` overflows. Zero prices and amounts
/// are kept; [`crate::select::best_order`] filters them out.
pub fn normalize(raw: &RawOrder, side: Side, symbol: &str) -> Option<Order> {
    let RawOrder::Offer {
        id,
        price,
        collateral,
    } = raw
    else {
        return None;
    };

    let price = parse_price(price);
    let collateral = parse_collateral(collateral);
    let amount = if price > Decimal::ZERO {
        collateral.checked_div(price)?
    } else {
        Decimal::ZERO
    };

    Some(Order {
        id: id.clone(),
        side,
        price,
        amount,
        collateral,
        symbol: symbol.to_string(),
    })
}

/// Reads collateral as a non-negative decimal; anything else is zero.
fn parse_collateral(raw: &RawNumber) -> Decimal {
    let value = match raw {
        RawNumber::Numeric(value) => *value,
        RawNumber::Text(text) => parse_decimal(text).unwrap_or(Decimal::ZERO),
        RawNumber::Absent => Decimal::ZERO,
    };
    value.max(Decimal::ZERO)
}
