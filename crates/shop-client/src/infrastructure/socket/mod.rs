//! WebSocket implementation of the realtime channel transport.
//!
//! # Connection sequence
//!
//! ```text
//! client                                   server
//!   │ ── WebSocket upgrade ─────────────────► │
//!   │ ◄──────── {"event":"connect","data":{"socketId":"…"}} │
//!   │   (connect() resolves with socketId)    │
//!   │ ── {"event":"registerUser",…} ────────► │   sent by ConnectionManager
//!   │ ◄──────── {"event":"orderStatusChanged",…}  …
//! ```
//!
//! After the handshake the stream is split: the write half sits behind an
//! async mutex inside [`WsSender`], and a pump task decodes inbound text
//! frames into [`TransportSignal`]s.  Frames that fail to decode are logged
//! and skipped; they never take the channel down.

pub mod mock;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use shop_core::protocol::{ConnectAck, CONNECT_EVENT};
use shop_core::{decode_frame, encode_frame, OutboundEvent};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::application::connection_manager::{
    ChannelError, ChannelLink, ChannelSender, ChannelTransport, TransportSignal,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the inbound signal queue between the pump and the reader.
const SIGNAL_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct WsTransportConfig {
    /// e.g. `ws://127.0.0.1:8083`
    pub url: String,
    /// Maximum wait for the server's `connect` frame.
    pub handshake_timeout: Duration,
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8083".to_string(),
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

pub struct WsChannelTransport {
    config: WsTransportConfig,
}

impl WsChannelTransport {
    pub fn new(config: WsTransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ChannelTransport for WsChannelTransport {
    async fn connect(&self) -> Result<ChannelLink, ChannelError> {
        let url = &self.config.url;
        debug!(%url, "dialling realtime server");

        let (ws, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::Connect {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let (sink, mut stream) = ws.split();

        let connection_id = timeout(self.config.handshake_timeout, await_connect_frame(&mut stream))
            .await
            .map_err(|_| ChannelError::HandshakeTimeout(self.config.handshake_timeout))??;
        info!(%url, %connection_id, "realtime handshake complete");

        let (tx, rx) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
        tokio::spawn(pump_inbound(stream, tx));

        Ok(ChannelLink {
            connection_id,
            sender: Arc::new(WsSender {
                sink: Mutex::new(sink),
                closed: AtomicBool::new(false),
            }),
            signals: rx,
        })
    }
}

/// Reads frames until the server's `connect` frame and returns its socket id.
async fn await_connect_frame(stream: &mut SplitStream<WsStream>) -> Result<String, ChannelError> {
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => match decode_frame(&text) {
                Ok(frame) if frame.event == CONNECT_EVENT => {
                    return Ok(ConnectAck::from_frame(&frame)?.socket_id);
                }
                Ok(frame) => debug!(event = %frame.event, "frame before handshake ignored"),
                Err(e) => warn!("invalid frame during handshake: {e}"),
            },
            Ok(Message::Close(_)) => {
                return Err(ChannelError::Handshake("server closed before connect".into()))
            }
            Ok(_) => {}
            Err(e) => return Err(ChannelError::Handshake(e.to_string())),
        }
    }
    Err(ChannelError::Handshake("stream ended before connect".into()))
}

/// Forwards decoded inbound frames until the socket closes.
async fn pump_inbound(mut stream: SplitStream<WsStream>, tx: mpsc::Sender<TransportSignal>) {
    let reason = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => match decode_frame(&text) {
                Ok(frame) => {
                    if tx.send(TransportSignal::Event(frame.into())).await.is_err() {
                        // Reader stopped; the manager closed this channel.
                        return;
                    }
                }
                Err(e) => warn!("skipping invalid frame: {e}"),
            },
            Some(Ok(Message::Close(frame))) => {
                break frame
                    .map(|f| f.reason.to_string())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| "closed by server".to_string());
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => break e.to_string(),
            None => break "connection closed".to_string(),
        }
    };
    debug!(%reason, "inbound pump finished");
    let _ = tx.send(TransportSignal::Closed { reason }).await;
}

/// Write half of an established WebSocket channel.
pub struct WsSender {
    sink: Mutex<SplitSink<WsStream, Message>>,
    closed: AtomicBool,
}

#[async_trait]
impl ChannelSender for WsSender {
    async fn send(&self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::NotConnected);
        }
        let kind = event.kind().to_string();
        let text = encode_frame(&event.into_frame())?;
        self.sink
            .lock()
            .await
            .send(Message::Text(text))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))?;
        debug!(%kind, "frame sent");
        Ok(())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.sink.lock().await.close().await {
            debug!("websocket close: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
