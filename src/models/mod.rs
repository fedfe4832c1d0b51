//! Wire and domain models for the ticker feed.
//!
//! Contains the subscribe request sent after connecting, the ticker
//! snapshot kept per symbol, and the symbol normalization rules shared by
//! the store, the rotation and the subscribe payload.

pub mod ticker;

use serde::Serialize;

pub use ticker::TickerSnapshot;

/// Stream suffix of the per-symbol 24h ticker channel.
pub const TICKER_CHANNEL: &str = "ticker";

/// Characters that separate base and quote asset in configured symbols.
const SEPARATORS: [char; 3] = ['-', '/', '_'];

/// Normalizes a configured pair (`"btc-usdt"`) to the feed's key form (`"BTCUSDT"`).
#[must_use]
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect::<String>()
        .to_uppercase()
}

/// Returns the ticker stream name for a symbol, e.g. `"btcusdt@ticker"`.
#[must_use]
pub fn ticker_stream(symbol: &str) -> String {
    format!(
        "{}@{TICKER_CHANNEL}",
        normalize_symbol(symbol).to_lowercase()
    )
}

/// A batched `SUBSCRIBE` request sent once per connection.
///
/// Serializes as `{"method":"SUBSCRIBE","params":[...],"id":N}`.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    pub method: String,
    pub params: Vec<String>,
    pub id: u64,
}

impl SubscribeRequest {
    /// Creates a request subscribing to the ticker stream of every symbol.
    #[must_use]
    pub fn new(symbols: &[String], id: u64) -> Self {
        Self {
            method: "SUBSCRIBE".to_string(),
            params: symbols.iter().map(|s| ticker_stream(s)).collect(),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators_and_uppercases() {
        assert_eq!(normalize_symbol("btc-usdt"), "BTCUSDT");
        assert_eq!(normalize_symbol("ETH/USDT"), "ETHUSDT");
        assert_eq!(normalize_symbol(" sol_usdt "), "SOLUSDT");
        assert_eq!(normalize_symbol("BTCUSDT"), "BTCUSDT");
    }

    #[test]
    fn ticker_stream_is_lowercase() {
        assert_eq!(ticker_stream("BTC-USDT"), "btcusdt@ticker");
    }

    #[test]
    fn subscribe_request_wire_format() {
        let symbols = vec!["BTC-USDT".to_string(), "ETH-USDT".to_string()];
        let json = serde_json::to_string(&SubscribeRequest::new(&symbols, 1)).unwrap();
        assert_eq!(
            json,
            r#"{"method":"SUBSCRIBE","params":["btcusdt@ticker","ethusdt@ticker"],"id":1}"#
        );
    }
}
