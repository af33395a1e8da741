//! Human-readable rendering of changes and snapshots.
//!
//! Alert text uses Telegram's HTML parse mode. Prices show six decimals;
//! amounts and collateral are rounded to whole units and grouped by
//! thousands.

use std::collections::BTreeMap;
use std::fmt::Write;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::PairsConfig;
use crate::models::order::{Order, OrderChange, PairSnapshot};

/// Separator drawn after each order block.
const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Heading of the board printed after the first cycle.
pub const CURRENT_ORDERS_TITLE: &str = "📊 CURRENT MARKET ORDERS";

/// Heading of the board printed when changes were detected.
pub const NEW_ORDERS_TITLE: &str = "🚨 NEW ORDERS DETECTED 🚨";

/// Renders the alert message for a batch of changes.
///
/// Changes whose side disappeared have no current order and produce no
/// block. Returns `None` if no block was rendered, so a cycle in which
/// sides only vanished sends nothing rather than a bare header.
pub fn render_changes(changes: &[OrderChange], pairs: &PairsConfig) -> Option<String> {
    let mut blocks = changes
        .iter()
        .filter_map(|change| change.current.as_ref())
        .peekable();
    blocks.peek()?;

    let mut out = String::from("🔄 <b>ORDER UPDATE DETECTED</b> 🔄\n\n");
    for order in blocks {
        let _ = writeln!(
            out,
            "{} {} <b>{} {}</b>",
            pairs.emoji(&order.symbol),
            order.side.marker(),
            order.symbol,
            order.side.label()
        );
        let _ = writeln!(out, "💰 Price: ${}", format_price(order.price));
        let _ = writeln!(out, "📦 Amount: {} tokens", format_grouped(order.amount));
        let _ = writeln!(out, "💵 Collateral: ${}", format_grouped(order.collateral));
        let _ = writeln!(out, "{SEPARATOR}");
    }
    Some(out)
}

/// Renders the console board of best orders for every configured pair.
///
/// Pairs without any order are omitted.
pub fn render_board(
    title: &str,
    snapshots: &BTreeMap<String, PairSnapshot>,
    pairs: &PairsConfig,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{}", "=".repeat(60));

    for (symbol, pair) in pairs.iter() {
        let Some(snapshot) = snapshots.get(symbol).filter(|s| !s.is_empty()) else {
            continue;
        };
        let _ = writeln!(out, "{} {symbol}", pair.emoji);
        for order in snapshot.orders() {
            let _ = writeln!(out, "{}", board_line(order));
        }
        let _ = writeln!(out, "{SEPARATOR}");
    }
    out
}

/// One board row, e.g. `🟢 BUY: $0.012000 | 8,333 tokens | $100`.
pub fn board_line(order: &Order) -> String {
    format!(
        "{} {}: ${} | {} tokens | ${}",
        order.side.marker(),
        order.side.label(),
        format_price(order.price),
        format_grouped(order.amount),
        format_grouped(order.collateral)
    )
}

/// Startup notification sent before the first cycle.
pub fn render_startup(pairs: &PairsConfig, poll_secs: u64) -> String {
    format!(
        "🤖 <b>Whales Market Monitor Started</b>\n\nMonitoring {} tokens every {poll_secs} seconds...",
        pairs.symbols()
    )
}

/// Formats a price with exactly six decimals.
///
/// Built from the integer and fractional parts separately: `Decimal`'s own
/// precision formatting overflows its buffer for very large values.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(6, RoundingStrategy::MidpointNearestEven);
    let micros = (rounded.fract().abs() * Decimal::from(1_000_000))
        .to_u32()
        .unwrap_or(0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}.{micros:06}", rounded.abs().trunc())
}

/// Rounds to a whole number and inserts `,` every three digits.
pub fn format_grouped(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
