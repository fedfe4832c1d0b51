//! The ticker subscription sent right after connecting.

use futures_util::SinkExt;
use tracing::{debug, info};
use tungstenite::Message;

use super::WsWriter;
use crate::Result;
use crate::models::SubscribeRequest;

/// Subscribes to the ticker stream of every symbol in one batched request.
///
/// `id` is echoed back by the feed in its acknowledgement.
///
/// # Errors
///
/// Returns a [`TickerError`](crate::TickerError) if sending the subscription message fails.
pub async fn subscribe(write: &mut WsWriter, symbols: &[String], id: u64) -> Result<()> {
    let request = SubscribeRequest::new(symbols, id);
    let json = serde_json::to_string(&request)?;
    debug!("Sending subscribe request: {}", json);
    write.send(Message::Text(json.into())).await?;
    info!(streams = ?request.params, id, "Subscribed to ticker streams");

    Ok(())
}
