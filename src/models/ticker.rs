use rust_decimal::Decimal;

/// Latest 24h ticker figures for one symbol.
///
/// Replaced wholesale on every update; decimals keep the scale the feed
/// sent (`"50000.00"` stays `50000.00`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSnapshot {
    /// Normalized symbol, e.g. `BTCUSDT`.
    pub symbol: String,
    /// Last traded price.
    pub price: Decimal,
    /// 24h change in percent, always four decimal places.
    pub change_percent: Decimal,
    /// 24h volume in the base asset.
    pub base_volume: Decimal,
    /// 24h volume in the quote asset.
    pub quote_volume: Decimal,
}
