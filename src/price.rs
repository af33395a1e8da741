//! Price parsing.
//!
//! Very small prices are sometimes quoted in a compact form where the run
//! of zeros after the decimal point is written as a single Unicode
//! subscript digit: `0.0₃78` decodes as `"0." + "000" + "78"` = `0.00078`.
//! The `0.0` prefix always shows one zero, so `₀` decodes like `₁`.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::offer::RawNumber;

/// Prefix that precedes the subscript digit in the compact notation.
const COMPACT_PREFIX: &str = "0.0";

/// Parses a raw price into a decimal.
///
/// Never fails: anything that cannot be read as a price yields zero.
pub fn parse_price(raw: &RawNumber) -> Decimal {
    match raw {
        RawNumber::Numeric(value) => *value,
        RawNumber::Text(text) => parse_price_text(text),
        RawNumber::Absent => Decimal::ZERO,
    }
}

/// Parses a textual price, decoding the subscript-zero form if present.
pub fn parse_price_text(text: &str) -> Decimal {
    if let Some(decoded) = decode_compact(text) {
        return parse_decimal(&decoded).unwrap_or(Decimal::ZERO);
    }
    parse_decimal(text).unwrap_or(Decimal::ZERO)
}

/// Parses a plain decimal string, accepting scientific notation.
///
/// Returns `None` for anything else, including values outside the range
/// of [`Decimal`].
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Expands `0.0<subscript k><digits>` into `0.<k zeros><digits>`, with
/// at least one zero.
///
/// Only the leading match matters; anything after the digit run is
/// ignored.
fn decode_compact(text: &str) -> Option<String> {
    let rest = text.strip_prefix(COMPACT_PREFIX)?;
    let mut chars = rest.chars();
    let zeros = subscript_value(chars.next()?)?.max(1);
    let digits: String = chars.take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let mut decoded = String::with_capacity(2 + zeros + digits.len());
    decoded.push_str("0.");
    decoded.extend(std::iter::repeat_n('0', zeros));
    decoded.push_str(&digits);
    Some(decoded)
}

/// Maps `₀`..`₉` (U+2080..U+2089) to 0..9.
fn subscript_value(c: char) -> Option<usize> {
    match c {
        '\u{2080}'..='\u{2089}' => Some(c as usize - '\u{2080}' as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn compact_notation_expands_zero_run() {
        assert_eq!(parse_price_text("0.0₃78"), dec!(0.00078));
        assert_eq!(parse_price_text("0.0₀5"), dec!(0.05));
        assert_eq!(parse_price_text("0.0₁5"), dec!(0.05));
        assert_eq!(parse_price_text("0.0₉1"), dec!(0.0000000001));
    }

    #[test]
    fn compact_notation_ignores_trailing_text() {
        assert_eq!(parse_price_text("0.0₂45 USD"), dec!(0.0045));
    }

    #[test]
    fn compact_notation_requires_digits() {
        // Falls back to a plain parse, which also fails.
        assert_eq!(parse_price_text("0.0₃"), Decimal::ZERO);
        assert_eq!(parse_price_text("0.0₃x1"), Decimal::ZERO);
    }

    #[test]
    fn plain_strings_parse_directly() {
        for s in ["1", "0.5", "1234.000001", "0.00078", "42.10"] {
            assert_eq!(parse_price_text(s), Decimal::from_str(s).unwrap(), "{s}");
        }
        assert_eq!(parse_price_text(" 2.5 "), dec!(2.5));
        assert_eq!(parse_price_text("1e-3"), dec!(0.001));
    }

    #[test]
    fn malformed_input_is_zero() {
        for s in ["", "abc", "1.2.3", "NaN", "inf", "0.0x5", "--1"] {
            assert_eq!(parse_price_text(s), Decimal::ZERO, "{s}");
        }
    }

    #[test]
    fn numeric_passes_through() {
        assert_eq!(parse_price(&RawNumber::Numeric(dec!(3.14))), dec!(3.14));
        assert_eq!(parse_price(&RawNumber::Absent), Decimal::ZERO);
        assert_eq!(parse_price(&RawNumber::from("0.0₁9")), dec!(0.09));
    }
}
