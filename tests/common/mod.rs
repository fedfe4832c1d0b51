//! Shared test utilities: a local WebSocket server standing in for the feed.

#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tungstenite::Message;

use tickerwheel::config::{AppConfig, FeedConfig};
use tickerwheel::models::TickerSnapshot;
use tickerwheel::store::TickerStore;

/// Ticker frame for BTCUSDT as sent by the feed.
pub const BTC_FRAME: &str = r#"{"s":"BTCUSDT","c":"50000.00","P":"1.2345","v":"10","q":"500000"}"#;

/// Ticker frame for ETHUSDT as sent by the feed.
pub const ETH_FRAME: &str = r#"{"s":"ETHUSDT","c":"2250.55","P":"-0.68","v":"4567.8","q":"10280000.5"}"#;

/// Subscription acknowledgement.
pub const ACK_FRAME: &str = r#"{"result":null,"id":1}"#;

/// What the mock feed does after sending its frames.
#[derive(Debug, Clone, Copy)]
pub enum AfterFrames {
    /// Send a close frame.
    Close,
    /// Keep the connection open until the client leaves.
    Hold,
}

/// A running mock feed.
pub struct MockFeed {
    pub port: u16,
    /// First text message received on each connection (the subscribe request).
    pub subscriptions: mpsc::UnboundedReceiver<String>,
}

impl MockFeed {
    /// URL template pointing at this server.
    pub fn url_template(&self) -> String {
        format!("ws://127.0.0.1:{}/ws/{{stream}}", self.port)
    }

    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws/btcusdt@ticker", self.port)
    }
}

/// Starts a feed that, per connection, reads the subscribe request,
/// replays `frames`, then behaves as `after`.
pub async fn spawn_mock_feed(frames: Vec<String>, after: AfterFrames) -> MockFeed {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock feed");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let frames = frames.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                    return;
                };

                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    let _ = tx.send(text.as_str().to_string());
                }

                for frame in frames {
                    if ws.send(Message::Text(frame.into())).await.is_err() {
                        return;
                    }
                }

                match after {
                    AfterFrames::Close => {
                        let _ = ws.close(None).await;
                    }
                    AfterFrames::Hold => while let Some(Ok(_)) = ws.next().await {},
                }
            });
        }
    });

    MockFeed {
        port,
        subscriptions: rx,
    }
}

/// A mock feed that pings the client, then sends [`BTC_FRAME`] and holds.
pub struct PingingFeed {
    pub port: u16,
    /// Payload of every pong the client sent back.
    pub pongs: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl PingingFeed {
    pub fn url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws/btcusdt@ticker", self.port)
    }
}

/// Starts a feed that sends `Ping(payload)` right after the subscribe request.
pub async fn spawn_pinging_feed(payload: &'static [u8]) -> PingingFeed {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock feed");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
            return;
        };
        let _ = ws.next().await;

        if ws.send(Message::Ping(payload.into())).await.is_err() {
            return;
        }
        if ws.send(Message::Text(BTC_FRAME.into())).await.is_err() {
            return;
        }

        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Pong(data) = msg {
                let _ = tx.send(data.to_vec());
            }
        }
    });

    PingingFeed { port, pongs: rx }
}

/// Starts a TCP listener that accepts connections but never answers the
/// WebSocket handshake. Returns its port.
pub async fn spawn_mute_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    port
}

/// Returns a local port with nothing listening on it.
pub async fn dead_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Configuration for `BTC-USDT,ETH-USDT` against `url_template`.
pub fn test_config(url_template: String) -> AppConfig {
    AppConfig {
        symbols: vec!["BTC-USDT".to_string(), "ETH-USDT".to_string()],
        toggle_rate: 2,
        feed: FeedConfig {
            url_template,
            reconnect_delay: Duration::from_millis(20),
            timeout: Duration::from_secs(5),
        },
    }
}

/// Polls `store` until `symbol` has a snapshot or `within` elapses.
pub async fn wait_for_snapshot(
    store: &TickerStore,
    symbol: &str,
    within: Duration,
) -> Option<std::sync::Arc<TickerSnapshot>> {
    tokio::time::timeout(within, async {
        loop {
            if let Some(snapshot) = store.get(symbol) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .ok()
}
