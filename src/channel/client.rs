//! Tungstenite-backed live channel client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch, Notify};
use tokio_tungstenite::tungstenite::Message as WsFrame;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::wire::WireChatEvent;
use super::ChannelState;
use crate::error::{ChannelError, ChatError};
use crate::models::{ConversationId, Message};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsFrame>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Configuration for the live channel endpoint.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Host (and optional port) of the chat server
    pub host: String,
    /// Use wss:// instead of ws://
    pub use_tls: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:8000".to_string(),
            use_tls: false,
        }
    }
}

impl From<&crate::config::ChatConfig> for ChannelConfig {
    fn from(config: &crate::config::ChatConfig) -> Self {
        Self {
            host: config.ws_host.clone(),
            use_tls: config.use_tls,
        }
    }
}

/// A live WebSocket connection scoped to one conversation.
///
/// Inbound JSON events are decoded into [`Message`] values and fanned out
/// on a broadcast channel; outbound sends transmit the raw text as the
/// entire frame payload. There is no reconnection: once the connection
/// drops or is closed the channel stays `Closed`.
pub struct ChatChannel {
    conversation: ConversationId,
    /// Queue of raw outbound text payloads
    outgoing_tx: mpsc::Sender<String>,
    /// Fan-out of decoded inbound messages
    incoming_tx: broadcast::Sender<Message>,
    state_rx: watch::Receiver<ChannelState>,
    shutdown: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
}

impl ChatChannel {
    /// Build the connection URL for a conversation.
    ///
    /// The auth token travels as a query parameter because the transport
    /// cannot set headers at connect time.
    pub fn endpoint_url(config: &ChannelConfig, conversation: &ConversationId, token: &str) -> String {
        let scheme = if config.use_tls { "wss" } else { "ws" };
        format!(
            "{}://{}/chat/ws/chat/{}?token={}",
            scheme,
            config.host,
            conversation,
            urlencoding::encode(token)
        )
    }

    /// Connect to the chat server for the given conversation.
    ///
    /// Returns an `Open` channel on handshake success, or
    /// [`ChannelError::ConnectionFailed`] otherwise.
    pub async fn connect(
        config: ChannelConfig,
        conversation: ConversationId,
        token: &str,
    ) -> Result<Self, ChatError> {
        let url = Self::endpoint_url(&config, &conversation, token);

        let (ws_stream, _) = connect_async(&url)
            .await
            .map_err(|e| ChannelError::ConnectionFailed(e.to_string()))?;

        info!("Live channel open for conversation {}", conversation);

        let (ws_sink, ws_stream) = ws_stream.split();

        let (incoming_tx, _) = broadcast::channel::<Message>(100);
        let (outgoing_tx, outgoing_rx) = mpsc::channel::<String>(100);
        let (state_tx, state_rx) = watch::channel(ChannelState::Open);

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_notify = Arc::new(Notify::new());

        tokio::spawn(run_connection_loop(
            conversation.clone(),
            ws_sink,
            ws_stream,
            incoming_tx.clone(),
            outgoing_rx,
            state_tx,
            shutdown.clone(),
            shutdown_notify.clone(),
        ));

        Ok(Self {
            conversation,
            outgoing_tx,
            incoming_tx,
            state_rx,
            shutdown,
            shutdown_notify,
        })
    }

    /// The conversation this channel is scoped to.
    pub fn conversation(&self) -> &ConversationId {
        &self.conversation
    }

    /// Current connection state.
    pub fn state(&self) -> ChannelState {
        *self.state_rx.borrow()
    }

    /// Whether the channel is currently open.
    pub fn is_open(&self) -> bool {
        self.state() == ChannelState::Open
    }

    /// Subscribe to connection state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Subscribe to decoded inbound messages.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.incoming_tx.subscribe()
    }

    /// Queue a raw text payload for transmission. Fire-and-forget: no
    /// acknowledgement is awaited; delivery is only observed if the
    /// server echoes the message back as an inbound event.
    pub async fn send(&self, text: &str) -> Result<(), ChatError> {
        self.outgoing_tx
            .send(text.to_string())
            .await
            .map_err(|e| ChannelError::SendFailed(e.to_string()).into())
    }

    /// Close the connection. Idempotent; valid from any state.
    pub fn close(&self) {
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            debug!(
                "Closing live channel for conversation {}",
                self.conversation
            );
        }
        self.shutdown_notify.notify_one();
    }
}

impl Drop for ChatChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read/write loop for one connection. Ends (and publishes `Closed`) on
/// explicit close, a close frame, or a fatal transport error.
#[allow(clippy::too_many_arguments)]
async fn run_connection_loop(
    conversation: ConversationId,
    mut ws_sink: WsSink,
    mut ws_stream: WsStream,
    incoming_tx: broadcast::Sender<Message>,
    mut outgoing_rx: mpsc::Receiver<String>,
    state_tx: watch::Sender<ChannelState>,
    shutdown: Arc<AtomicBool>,
    shutdown_notify: Arc<Notify>,
) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            let _ = ws_sink.close().await;
            break;
        }

        tokio::select! {
            _ = shutdown_notify.notified() => {
                debug!("Shutdown signal received, closing connection");
                let _ = ws_sink.close().await;
                break;
            }

            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsFrame::Text(text))) => {
                        match serde_json::from_str::<WireChatEvent>(&text) {
                            Ok(event) => {
                                // Ignore send errors (no subscribers)
                                let _ = incoming_tx.send(event.into());
                            }
                            Err(e) => {
                                // Skip malformed frames, never fatal
                                warn!("Failed to parse inbound frame: {} - {}", e, text);
                            }
                        }
                    }
                    Some(Ok(WsFrame::Ping(data))) => {
                        debug!("Received ping, sending pong");
                        let _ = ws_sink.send(WsFrame::Pong(data)).await;
                    }
                    Some(Ok(WsFrame::Close(_))) => {
                        info!("Received close frame from server");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ignore other frame types (Pong, Binary, Frame)
                    }
                    Some(Err(e)) => {
                        error!("Live channel transport error: {}", e);
                        break;
                    }
                    None => {
                        info!("Live channel stream ended");
                        break;
                    }
                }
            }

            outgoing = outgoing_rx.recv() => {
                match outgoing {
                    Some(text) => {
                        // Raw text payload, not JSON-wrapped
                        if let Err(e) = ws_sink.send(WsFrame::Text(text)).await {
                            error!("Failed to send frame: {}", e);
                        }
                    }
                    None => {
                        debug!("Outgoing queue closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    let _ = state_tx.send(ChannelState::Closed);
    info!("Live channel loop ended for conversation {}", conversation);
}
