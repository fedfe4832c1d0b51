//! Crate-level error types.
//!
//! [`TickerError`] covers every failure that can end a feed session or stop
//! the process (configuration, WebSocket, JSON, timeouts, terminal I/O).
//! [`DecodeError`] is kept apart: a frame that fails to decode is skipped
//! and never ends the session that received it.

use std::time::Duration;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TickerError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The feed endpoint is not a usable WebSocket URL.
    #[error("invalid feed endpoint: {0}")]
    InvalidEndpoint(String),

    /// Connecting, or waiting for the next frame, took too long.
    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),

    /// The remote side closed the session.
    #[error("connection closed: {0}")]
    Closed(String),

    /// Terminal or stdout failure in a presenter.
    #[error("io error: {0}")]
    Io(String),

    /// A background task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

impl TickerError {
    /// Returns `true` for errors that retrying cannot fix.
    ///
    /// The supervisor escalates these instead of backing off when they
    /// show up on the first connection attempt.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidEndpoint(_))
    }
}

/// Why a single feed frame could not be turned into a ticker update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The frame is not a JSON object.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// A ticker frame is missing one or more required fields.
    #[error("ticker frame missing fields: {}", .0.join(", "))]
    IncompleteFields(Vec<&'static str>),

    /// A required field is present but is not a decimal number.
    #[error("field `{field}` is not a decimal: {value}")]
    InvalidNumber { field: &'static str, value: String },
}
