//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is read first (if present), then:
//! - `SYMBOLS`: comma-separated, ordered list of trading pairs (required)
//! - `TOGGLE_RATE`: seconds between symbol rotations (default 3)
//! - `FEED_URL`: endpoint template, `{stream}` is replaced by the ticker stream
//! - `RECONNECT_DELAY`: seconds to wait before reconnecting (default 5)
//! - `FEED_TIMEOUT`: connect and feed-silence timeout in seconds (default 30)
//!
//! Every invalid value is a [`TickerError::Config`](crate::TickerError::Config)
//! and stops the process before anything connects.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use crate::TickerError;
use crate::models::ticker_stream;

/// Default public ticker endpoint; `{stream}` becomes e.g. `btcusdt@ticker`.
pub const DEFAULT_FEED_URL: &str = "wss://stream.binance.com:9443/ws/{stream}";

/// Placeholder substituted in the feed URL template.
pub const STREAM_PLACEHOLDER: &str = "{stream}";

const DEFAULT_TOGGLE_RATE: u64 = 3;
const DEFAULT_RECONNECT_DELAY: u64 = 5;
const DEFAULT_FEED_TIMEOUT: u64 = 30;

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub symbols: Vec<String>,
    pub toggle_rate: u64,
    pub feed: FeedConfig,
}

/// Feed connection settings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url_template: String,
    pub reconnect_delay: Duration,
    pub timeout: Duration,
}

impl AppConfig {
    /// Rotation interval as a [`Duration`].
    #[must_use]
    pub fn toggle_interval(&self) -> Duration {
        Duration::from_secs(self.toggle_rate)
    }

    /// Renders the endpoint template for the first configured symbol.
    ///
    /// One connection carries every symbol; the rest are added by the
    /// batched subscribe request sent after connecting.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let stream = self
            .symbols
            .first()
            .map(|s| ticker_stream(s))
            .unwrap_or_default();
        self.feed.url_template.replace(STREAM_PLACEHOLDER, &stream)
    }
}

/// Loads `.env` (if any) and then the configuration from the environment.
///
/// # Errors
///
/// Returns [`TickerError::Config`] if a `.env` file exists but cannot be
/// parsed, if `SYMBOLS` is missing or empty, or if any numeric setting is
/// not a positive integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    dotenv_loaded(dotenvy::dotenv(), ".env")?;
    from_env()
}

/// Loads variables from the dotenv file at `path`, then the configuration.
///
/// Variables already present in the environment take precedence over the
/// file.
///
/// # Errors
///
/// Returns [`TickerError::Config`] if the file exists but cannot be parsed,
/// or for any of the reasons listed on [`fetch_config`].
pub fn fetch_config_from(path: &Path) -> crate::Result<AppConfig> {
    dotenv_loaded(dotenvy::from_path(path), path.display())?;
    from_env()
}

/// Accepts a loaded or absent dotenv file; anything else is a config error.
fn dotenv_loaded<T>(
    result: std::result::Result<T, dotenvy::Error>,
    origin: impl Display,
) -> crate::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(TickerError::Config(format!("failed to read {origin}: {e}"))),
    }
}

/// Builds the configuration from the current process environment only.
///
/// # Errors
///
/// See [`fetch_config`].
pub fn from_env() -> crate::Result<AppConfig> {
    let symbols = parse_symbols(non_empty_var("SYMBOLS").as_deref())?;
    let toggle_rate = positive_secs("TOGGLE_RATE", DEFAULT_TOGGLE_RATE)?;
    let reconnect_delay = positive_secs("RECONNECT_DELAY", DEFAULT_RECONNECT_DELAY)?;
    let timeout = positive_secs("FEED_TIMEOUT", DEFAULT_FEED_TIMEOUT)?;
    let url_template =
        non_empty_var("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

    Ok(AppConfig {
        symbols,
        toggle_rate,
        feed: FeedConfig {
            url_template,
            reconnect_delay: Duration::from_secs(reconnect_delay),
            timeout: Duration::from_secs(timeout),
        },
    })
}

/// Splits a comma-separated symbol list, keeping the configured order.
///
/// # Errors
///
/// Returns [`TickerError::Config`] if the list is absent or has an empty entry.
pub fn parse_symbols(raw: Option<&str>) -> crate::Result<Vec<String>> {
    let raw = raw.ok_or_else(|| {
        TickerError::Config("SYMBOLS is not set; expected e.g. SYMBOLS=BTC-USDT,ETH-USDT".into())
    })?;

    let symbols: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
    if symbols.iter().any(String::is_empty) {
        return Err(TickerError::Config(format!(
            "SYMBOLS contains an empty entry: {raw:?}"
        )));
    }

    Ok(symbols)
}

/// Reads a positive integer number of seconds, falling back to `default`.
fn positive_secs(name: &str, default: u64) -> crate::Result<u64> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(TickerError::Config(format!(
            "{name} must be a positive integer, got {raw:?}"
        ))),
        Ok(value) => Ok(value),
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
