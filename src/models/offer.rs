//! Offers endpoint models.
//!
//! Records in the offer list are loosely typed: prices arrive as JSON
//! numbers or as compact strings, ids as strings or numbers, and fields
//! may be missing entirely. [`RawOrder::from_value`] is the single place
//! a record is inspected; it never fails, so one odd record cannot reject
//! the whole page.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::price::parse_decimal;
use rust_decimal::Decimal;

/// Response body of the offers endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub data: Option<OffersPage>,
}

/// One page of offers.
#[derive(Debug, Default, Deserialize)]
pub struct OffersPage {
    #[serde(default)]
    pub list: Option<Vec<RawOrder>>,
}

impl OffersResponse {
    /// Consumes the response and returns the offer list, empty when the
    /// `data` or `list` field is missing or null.
    pub fn into_orders(self) -> Vec<RawOrder> {
        self.data.and_then(|page| page.list).unwrap_or_default()
    }
}

/// A numeric field as it appeared on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    /// A JSON number that fits in a [`Decimal`].
    Numeric(Decimal),
    /// A JSON string, or a JSON number outside the decimal range.
    Text(String),
    /// Missing, null, or a non-scalar value.
    Absent,
}

impl RawNumber {
    /// Classifies an optional JSON value.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => {
                let text = n.to_string();
                match parse_decimal(&text) {
                    Some(d) => RawNumber::Numeric(d),
                    None => RawNumber::Text(text),
                }
            }
            Some(Value::String(s)) => RawNumber::Text(s.clone()),
            _ => RawNumber::Absent,
        }
    }
}

impl From<Decimal> for RawNumber {
    fn from(value: Decimal) -> Self {
        RawNumber::Numeric(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// A single offer record as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOrder {
    /// A JSON object; individual fields may still be missing or malformed.
    Offer {
        id: Option<String>,
        price: RawNumber,
        collateral: RawNumber,
    },
    /// Not a JSON object. Holds the JSON type that was found instead.
    Unreadable(&'static str),
}

impl RawOrder {
    /// Converts one JSON record into a [`RawOrder`].
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return RawOrder::Unreadable(json_kind(value));
        };

        let id = match map.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        RawOrder::Offer {
            id,
            price: RawNumber::from_value(map.get("price")),
            collateral: RawNumber::from_value(map.get("collateral")),
        }
    }

    /// Convenience constructor for a readable offer.
    pub fn offer(
        id: impl Into<String>,
        price: impl Into<RawNumber>,
        collateral: impl Into<RawNumber>,
    ) -> Self {
        RawOrder::Offer {
            id: Some(id.into()),
            price: price.into(),
            collateral: collateral.into(),
        }
    }
}

impl<'de> Deserialize<'de> for RawOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
