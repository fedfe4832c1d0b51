//! Streaming ingestion from the ticker feed.
//!
//! This module is organized by concern:
//! - [`decoder`] - Frame decoding into ticker updates
//! - [`subscription`] - The batched subscribe request
//! - [`connection`] - One single-attempt feed session
//! - [`supervisor`] - Reconnection with a fixed backoff

pub mod connection;
pub mod decoder;
pub mod subscription;
pub mod supervisor;

use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;
use tungstenite::client::IntoClientRequest;

use crate::Result;
use crate::error::TickerError;

pub use connection::FeedConnection;
pub use decoder::{FeedFrame, decode};
pub use subscription::subscribe;
pub use supervisor::ReconnectSupervisor;

/// Write half of a feed WebSocket connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a feed WebSocket connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// - [`TickerError::InvalidEndpoint`] if `url` is not a `ws://` or `wss://` URL.
/// - [`TickerError::Timeout`] if the handshake does not finish within `timeout`.
/// - [`TickerError::WebSocket`] if the connection or TLS handshake fails.
pub async fn connect(url: &str, timeout: Duration) -> Result<(WsWriter, WsReader)> {
    let request = url
        .into_client_request()
        .map_err(|e| TickerError::InvalidEndpoint(format!("{url}: {e}")))?;

    match request.uri().scheme_str() {
        Some("ws" | "wss") => {}
        _ => {
            return Err(TickerError::InvalidEndpoint(format!(
                "{url}: expected a ws:// or wss:// URL"
            )));
        }
    }

    let (ws_stream, _) = tokio::time::timeout(timeout, connect_async(request))
        .await
        .map_err(|_| TickerError::Timeout("connect", timeout))?
        .map_err(|e| match e {
            tungstenite::Error::Url(e) => TickerError::InvalidEndpoint(format!("{url}: {e}")),
            other => TickerError::WebSocket(other),
        })?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Resolves once shutdown is requested or the sender is gone.
///
/// The `watch::Ref` from `wait_for` is dropped here, so a `select!` that
/// uses this stays `Send` across later awaits.
pub(crate) async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
