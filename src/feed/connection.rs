//! A single feed session: connect, subscribe, read until the session ends.
//!
//! [`FeedConnection`] never retries. Whatever ends the session is returned
//! to the caller, which decides whether and when to reconnect (see
//! [`ReconnectSupervisor`](super::ReconnectSupervisor)).

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tungstenite::Message;

use super::decoder::{FeedFrame, decode};
use super::{WsReader, connect, stop_requested, subscribe};
use crate::Result;
use crate::error::TickerError;
use crate::models::TickerSnapshot;

/// Default limit for the handshake and for silence between frames.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for the close handshake during teardown.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// One streaming session to the ticker feed.
#[derive(Debug, Clone)]
pub struct FeedConnection {
    url: String,
    symbols: Vec<String>,
    request_id: u64,
    connect_timeout: Duration,
    idle_timeout: Duration,
}

impl FeedConnection {
    /// Creates a session that subscribes to `symbols` with correlation id `request_id`.
    #[must_use]
    pub fn new(url: impl Into<String>, symbols: Vec<String>, request_id: u64) -> Self {
        Self {
            url: url.into(),
            symbols,
            request_id,
            connect_timeout: DEFAULT_TIMEOUT,
            idle_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets both the handshake timeout and the feed-silence timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.idle_timeout = timeout;
        self
    }

    /// Runs the session until it ends.
    ///
    /// Every decoded ticker update is passed to `on_update` in arrival
    /// order. Frames that fail to decode are logged and skipped.
    ///
    /// Returns `Ok(())` only when `shutdown` is set (or its sender is
    /// gone); the connection is closed before returning in every case.
    ///
    /// # Errors
    ///
    /// Returns the reason the session ended: an invalid endpoint, a
    /// connect or read timeout, a WebSocket error, or a remote close.
    pub async fn run<F>(self, mut on_update: F, mut shutdown: watch::Receiver<bool>) -> Result<()>
    where
        F: FnMut(TickerSnapshot),
    {
        if *shutdown.borrow() {
            return Ok(());
        }

        info!(url = %self.url, "Connecting to feed");
        let (mut write, mut read) = tokio::select! {
            pair = connect(&self.url, self.connect_timeout) => pair?,
            () = stop_requested(&mut shutdown) => return Ok(()),
        };

        let outcome = match subscribe(&mut write, &self.symbols, self.request_id).await {
            Ok(()) => {
                self.read_loop(&mut read, &mut on_update, &mut shutdown)
                    .await
            }
            Err(e) => Err(e),
        };

        // Best-effort close handshake; the session is over either way.
        match tokio::time::timeout(CLOSE_TIMEOUT, write.close()).await {
            Ok(Ok(())) => debug!("Feed connection closed"),
            Ok(Err(e)) => debug!("Error while closing feed connection: {e}"),
            Err(_) => debug!("Timed out closing feed connection"),
        }

        outcome
    }

    async fn read_loop<F>(
        &self,
        read: &mut WsReader,
        on_update: &mut F,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<()>
    where
        F: FnMut(TickerSnapshot),
    {
        loop {
            let next = tokio::select! {
                msg = tokio::time::timeout(self.idle_timeout, read.next()) => {
                    msg.map_err(|_| TickerError::Timeout("feed read", self.idle_timeout))?
                }
                () = stop_requested(shutdown) => {
                    info!("Feed session stopping for shutdown");
                    return Ok(());
                }
            };

            match next {
                Some(Ok(Message::Text(text))) => self.handle_text(text.as_str(), on_update),
                // tungstenite queues the pong and flushes it on the next read.
                Some(Ok(Message::Ping(_))) => debug!("Ping from feed"),
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| format!("{} {}", u16::from(f.code), f.reason.as_str()))
                        .unwrap_or_else(|| "no close frame".to_string());
                    return Err(TickerError::Closed(reason));
                }
                Some(Ok(_)) => {} // Binary/Pong/Frame
                Some(Err(e)) => return Err(e.into()),
                None => return Err(TickerError::Closed("stream ended".to_string())),
            }
        }
    }

    fn handle_text<F>(&self, text: &str, on_update: &mut F)
    where
        F: FnMut(TickerSnapshot),
    {
        match decode(text) {
            Ok(FeedFrame::Ticker(snapshot)) => {
                debug!(symbol = %snapshot.symbol, price = %snapshot.price, "Ticker update");
                on_update(snapshot);
            }
            Ok(FeedFrame::Ack { id, error: None }) => {
                debug!(?id, expected = self.request_id, "Subscription acknowledged");
            }
            Ok(FeedFrame::Ack { id, error: Some(error) }) => {
                warn!(?id, %error, "Feed rejected request");
            }
            Err(e) => warn!(error = %e, "Skipping undecodable frame"),
        }
    }
}
