//! WebSocket transport feeding the push topics.
//!
//! Connects to the exchange feed, subscribes the order-book and
//! live-trades channels, and routes delivered payloads into the
//! matching [`PushTopic`]. Reconnects with exponential backoff on
//! connection loss.

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};
use tungstenite::Message;

use crate::config::FeedConfig;
use crate::error::MagpieError;
use crate::models::book::OrderBookSnapshot;
use crate::models::trade::TradeEvent;
use crate::shutdown::ShutdownSignal;
use crate::topic::push::PushTopic;

/// Initial backoff duration between reconnection attempts.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Maximum backoff duration between reconnection attempts.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Channel carrying full order-book snapshots.
const ORDER_BOOK_CHANNEL: &str = "order_book";

/// Channel carrying individual executed trades.
const LIVE_TRADES_CHANNEL: &str = "live_trades";

/// Write half of the feed connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of the feed connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Frame envelope: the payload arrives as a JSON-encoded string under
/// `data`, addressed by `event` and `channel`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Why the reader loop exited.
enum DisconnectReason {
    /// The connection was lost or errored.
    ConnectionError,
    /// Shutdown was triggered.
    Shutdown,
}

/// Long-lived feed client owning the connection lifecycle.
pub struct FeedClient {
    url: String,
    order_book: Arc<PushTopic<OrderBookSnapshot>>,
    trades: Arc<PushTopic<TradeEvent>>,
    shutdown: ShutdownSignal,
}

impl FeedClient {
    pub fn new(
        config: &FeedConfig,
        order_book: Arc<PushTopic<OrderBookSnapshot>>,
        trades: Arc<PushTopic<TradeEvent>>,
        shutdown: ShutdownSignal,
    ) -> Self {
        FeedClient {
            url: config.url.clone(),
            order_book,
            trades,
            shutdown,
        }
    }

    /// Runs the connection lifecycle until shutdown: connect, subscribe
    /// both channels, read until disconnection, back off, repeat.
    pub async fn run(self) {
        let mut backoff = INITIAL_BACKOFF;
        let mut shutdown = self.shutdown.clone();

        loop {
            if shutdown.is_triggered() {
                return;
            }

            info!(url = %self.url, "Connecting to feed");
            let (mut write, read) = match connect(&self.url).await {
                Ok(pair) => pair,
                Err(e) => {
                    error!("Feed connection failed: {e}");
                    if pause(backoff, &mut shutdown).await {
                        return;
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                    continue;
                }
            };

            if let Err(e) = subscribe_channels(&mut write).await {
                warn!("Feed subscription failed: {e}");
                if pause(backoff, &mut shutdown).await {
                    return;
                }
                backoff = (backoff * 2).min(MAX_BACKOFF);
                continue;
            }

            info!("Feed connected and subscribed");
            backoff = INITIAL_BACKOFF;

            match self.read_loop(read, &mut shutdown).await {
                DisconnectReason::Shutdown => {
                    info!("Feed client shutting down");
                    return;
                }
                DisconnectReason::ConnectionError => {
                    warn!(backoff_secs = backoff.as_secs(), "Feed lost, backing off");
                    if pause(backoff, &mut shutdown).await {
                        return;
                    }
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
            }
        }
    }

    /// Reads frames until disconnection or shutdown.
    async fn read_loop(
        &self,
        mut read: WsReader,
        shutdown: &mut ShutdownSignal,
    ) -> DisconnectReason {
        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            // A bad payload aborts only its own publish;
                            // the stream carries on.
                            if let Err(e) = self.route(&text).await {
                                error!(error = %e, "Failed to dispatch feed message");
                            }
                        }
                        Some(Ok(_)) => {} // Binary/Ping/Pong/Close frames
                        Some(Err(e)) => {
                            warn!("Feed error: {e}");
                            return DisconnectReason::ConnectionError;
                        }
                        None => {
                            warn!("Feed stream ended");
                            return DisconnectReason::ConnectionError;
                        }
                    }
                }

                () = shutdown.triggered() => {
                    return DisconnectReason::Shutdown;
                }
            }
        }
    }

    /// Routes one raw frame into the matching push topic.
    pub async fn route(&self, text: &str) -> crate::Result<()> {
        let envelope: Envelope = serde_json::from_str(text)?;

        match (envelope.event.as_str(), envelope.channel.as_deref()) {
            ("data", Some(ORDER_BOOK_CHANNEL)) => {
                let payload = envelope
                    .data
                    .ok_or_else(|| MagpieError::Malformed("book frame without data".into()))?;
                self.order_book.publish_raw(&payload).await
            }
            ("trade", Some(LIVE_TRADES_CHANNEL)) => {
                let payload = envelope
                    .data
                    .ok_or_else(|| MagpieError::Malformed("trade frame without data".into()))?;
                self.trades.publish_raw(&payload).await
            }
            ("pusher:connection_established", _) => {
                info!("Feed connection established");
                Ok(())
            }
            ("pusher_internal:subscription_succeeded", channel) => {
                debug!(channel, "Channel subscription confirmed");
                Ok(())
            }
            (event, channel) => {
                debug!(event, channel, "Ignoring feed event");
                Ok(())
            }
        }
    }
}

/// Establishes a WebSocket connection to the feed.
///
/// # Errors
///
/// Returns a [`MagpieError`](crate::MagpieError) if the connection or
/// TLS handshake fails.
pub async fn connect(url: &str) -> crate::Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("WebSocket handshake completed");

    Ok(ws_stream.split())
}

/// Subscribes the two push channels on a fresh connection.
async fn subscribe_channels(write: &mut WsWriter) -> crate::Result<()> {
    for channel in [ORDER_BOOK_CHANNEL, LIVE_TRADES_CHANNEL] {
        let frame = serde_json::to_string(&serde_json::json!({
            "event": "pusher:subscribe",
            "data": { "channel": channel }
        }))?;
        write.send(Message::Text(frame.into())).await?;
        info!(channel, "Subscribed to channel");
    }

    Ok(())
}

/// Sleeps for `interval` unless shutdown fires first. Returns `true`
/// when shutting down.
async fn pause(interval: Duration, shutdown: &mut ShutdownSignal) -> bool {
    tokio::select! {
        () = tokio::time::sleep(interval) => false,
        () = shutdown.triggered() => true,
    }
}
