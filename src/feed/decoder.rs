//! Turns one inbound feed frame into a ticker update.
//!
//! Subscription acknowledgements share the stream with ticker data, so
//! decoding has three outcomes: a [`FeedFrame::Ticker`], a
//! [`FeedFrame::Ack`] that carries no data, or a [`DecodeError`].

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::models::{TickerSnapshot, normalize_symbol};

/// Decimal places kept for the percent change.
pub const CHANGE_PERCENT_SCALE: u32 = 4;

const SYMBOL: &str = "s";
const LAST_PRICE: &str = "c";
const CHANGE_PERCENT: &str = "P";
const BASE_VOLUME: &str = "v";
const QUOTE_VOLUME: &str = "q";

const TICKER_FIELDS: [&str; 5] = [SYMBOL, LAST_PRICE, CHANGE_PERCENT, BASE_VOLUME, QUOTE_VOLUME];

/// A successfully decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedFrame {
    /// A full ticker update for one symbol.
    Ticker(TickerSnapshot),
    /// A response to a request we sent (subscribe ack, or an error reply).
    Ack { id: Option<u64>, error: Option<String> },
}

/// Decodes a single text frame.
///
/// Frames wrapped in a combined-stream envelope (`{"stream":..,"data":{..}}`)
/// are unwrapped first.
///
/// # Errors
///
/// - [`DecodeError::Malformed`] if the frame is not a JSON object.
/// - [`DecodeError::IncompleteFields`] if a ticker frame lacks a required field.
/// - [`DecodeError::InvalidNumber`] if a numeric field does not parse as a decimal.
pub fn decode(raw: &str) -> Result<FeedFrame, DecodeError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let value = unwrap_envelope(value);
    let Value::Object(obj) = value else {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    };

    let has_ticker_fields = TICKER_FIELDS.iter().any(|f| obj.contains_key(*f));
    if obj.contains_key("id") && !has_ticker_fields {
        return Ok(FeedFrame::Ack {
            id: obj.get("id").and_then(Value::as_u64),
            error: obj.get("error").filter(|e| !e.is_null()).map(describe_error),
        });
    }

    let missing: Vec<&'static str> = TICKER_FIELDS
        .iter()
        .copied()
        .filter(|f| obj.get(*f).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(DecodeError::IncompleteFields(missing));
    }

    let symbol = obj
        .get(SYMBOL)
        .and_then(Value::as_str)
        .ok_or_else(|| DecodeError::Malformed(format!("field `{SYMBOL}` is not a string")))?;

    let change_percent = decimal_field(&obj, CHANGE_PERCENT)?;

    Ok(FeedFrame::Ticker(TickerSnapshot {
        symbol: normalize_symbol(symbol),
        price: decimal_field(&obj, LAST_PRICE)?,
        change_percent: round_change(change_percent),
        base_volume: decimal_field(&obj, BASE_VOLUME)?,
        quote_volume: decimal_field(&obj, QUOTE_VOLUME)?,
    }))
}

/// Rounds half-to-even to four places and pads, so `1.2` reads `1.2000`.
fn round_change(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CHANGE_PERCENT_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(CHANGE_PERCENT_SCALE);
    rounded
}

fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut obj) if obj.contains_key("stream") && obj.contains_key("data") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Parses a field sent either as a string or as a bare JSON number.
///
/// serde_json keeps the literal text of bare numbers (`arbitrary_precision`),
/// so both forms parse from the digits that were sent.
fn decimal_field(obj: &Map<String, Value>, field: &'static str) -> Result<Decimal, DecodeError> {
    let text = match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        other => {
            return Err(DecodeError::InvalidNumber {
                field,
                value: other.map(Value::to_string).unwrap_or_default(),
            });
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| DecodeError::InvalidNumber { field, value: text })
}

fn describe_error(error: &Value) -> String {
    match error.get("msg").and_then(Value::as_str) {
        Some(msg) => match error.get("code") {
            Some(code) => format!("{msg} (code {code})"),
            None => msg.to_string(),
        },
        None => error.to_string(),
    }
}
