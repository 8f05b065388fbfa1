//! Connection manager: owns the lifecycle of the single realtime channel.
//!
//! # State machine
//!
//! ```text
//!               open(id)                 connect frame
//! Disconnected ─────────► Connecting ─────────────────► Connected
//!      ▲                      │ transport error              │
//!      └──────────────────────┘                              │
//!      ▲          close(id) / transport drop                 │
//!      └─────────────────────────────────────────────────────┘
//! ```
//!
//! `open` and `close` are serialised through one async mutex, so two `open`
//! calls racing each other produce a single transport connection.  Inbound
//! events are read by one task per connection and handed to the
//! [`EventBus`] strictly in arrival order.  A dropped transport is reported
//! as `Disconnected`; reconnecting is the caller's decision.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use shop_core::{InboundEvent, OutboundEvent, ProtocolError};
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::event_bus::{ConnectionEvent, DisconnectReason, EventBus};

/// Errors raised by a [`ChannelTransport`] or [`ChannelSender`].
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("no connect frame within {0:?}")]
    HandshakeTimeout(Duration),

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("channel is not connected")]
    NotConnected,

    #[error("send failed: {0}")]
    Send(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// What the transport reports after the handshake.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportSignal {
    Event(InboundEvent),
    Closed { reason: String },
}

/// Outbound half of an established channel.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, event: OutboundEvent) -> Result<(), ChannelError>;
    /// Closes the socket.  Safe to call more than once.
    async fn close(&self);
}

/// An established channel: the server-assigned id, a sender, and the inbound
/// signal stream.
pub struct ChannelLink {
    pub connection_id: String,
    pub sender: Arc<dyn ChannelSender>,
    pub signals: mpsc::Receiver<TransportSignal>,
}

/// Opens realtime channels.  Implemented by `infrastructure::socket`.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Resolves once the server's `connect` frame has arrived.
    async fn connect(&self) -> Result<ChannelLink, ChannelError>;
}

/// Observable channel state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting {
        identity: String,
    },
    Connected {
        identity: String,
        connection_id: String,
    },
}

impl ChannelState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ChannelState::Connected { .. })
    }

    pub fn identity(&self) -> Option<&str> {
        match self {
            ChannelState::Disconnected => None,
            ChannelState::Connecting { identity } | ChannelState::Connected { identity, .. } => {
                Some(identity.as_str())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Upper bound on the best-effort `unregisterUser` send during close.
    pub unregister_grace: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            unregister_grace: Duration::from_millis(500),
        }
    }
}

struct LiveChannel {
    identity: String,
    connection_id: String,
    sender: Arc<dyn ChannelSender>,
    reader: JoinHandle<()>,
    generation: u64,
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

pub struct ConnectionManager {
    transport: Arc<dyn ChannelTransport>,
    bus: Arc<EventBus>,
    config: ConnectionConfig,
    state: Arc<watch::Sender<ChannelState>>,
    live: Mutex<Option<LiveChannel>>,
    /// Bumped on every open and teardown; a reader only reports a drop if
    /// its generation is still current.
    generation: Arc<AtomicU64>,
}

impl ConnectionManager {
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        bus: Arc<EventBus>,
        config: ConnectionConfig,
    ) -> Self {
        let (state, _) = watch::channel(ChannelState::Disconnected);
        Self {
            transport,
            bus,
            config,
            state: Arc::new(state),
            live: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn state(&self) -> ChannelState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ChannelState> {
        self.state.subscribe()
    }

    /// Connection id of the live channel, if connected.
    pub fn connection_id(&self) -> Option<String> {
        match &*self.state.borrow() {
            ChannelState::Connected { connection_id, .. } => Some(connection_id.clone()),
            _ => None,
        }
    }

    /// Opens the channel for `identity` and registers it with the server.
    ///
    /// Returns the resulting state: `Connected` on success, `Disconnected` if
    /// the transport failed (a `ConnectFailed` lifecycle event is published).
    pub async fn open(&self, identity: &str) -> ChannelState {
        let mut live = self.live.lock().await;

        if let Some(channel) = live.as_ref() {
            let current = self.generation.load(Ordering::SeqCst) == channel.generation;
            let alive = !channel.reader.is_finished();
            if channel.identity == identity && current && alive && self.state().is_connected() {
                debug!(identity, "channel already open");
                return self.state();
            }
        }

        if let Some(previous) = live.take() {
            if previous.identity != identity {
                info!(
                    "switching realtime channel from {} to {identity}",
                    previous.identity
                );
            }
            self.teardown(previous).await;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ChannelState::Connecting {
            identity: identity.to_string(),
        });
        info!(identity, "opening realtime channel");

        let link = match self.transport.connect().await {
            Ok(link) => link,
            Err(e) => {
                warn!(identity, "realtime channel failed to open: {e}");
                self.state.send_replace(ChannelState::Disconnected);
                self.bus.publish_lifecycle(&ConnectionEvent::ConnectFailed {
                    reason: e.to_string(),
                });
                return ChannelState::Disconnected;
            }
        };

        let ChannelLink {
            connection_id,
            sender,
            signals,
        } = link;

        self.state.send_replace(ChannelState::Connected {
            identity: identity.to_string(),
            connection_id: connection_id.clone(),
        });
        info!(identity, %connection_id, "realtime channel connected");

        let reader = tokio::spawn(read_signals(
            signals,
            Arc::clone(&self.bus),
            Arc::clone(&self.state),
            Arc::clone(&self.generation),
            generation,
        ));

        self.bus.publish_lifecycle(&ConnectionEvent::Connected {
            connection_id: connection_id.clone(),
        });

        if let Err(e) = sender
            .send(OutboundEvent::register(identity, connection_id.as_str()))
            .await
        {
            warn!(identity, "registerUser was not delivered: {e}");
        }

        *live = Some(LiveChannel {
            identity: identity.to_string(),
            connection_id,
            sender,
            reader,
            generation,
        });
        self.state()
    }

    /// Unregisters and closes the channel owned by `identity`.
    ///
    /// Idempotent; a close for an identity that does not own the live
    /// channel is ignored.
    pub async fn close(&self, identity: &str) {
        let mut live = self.live.lock().await;

        match live.as_ref() {
            None => {
                debug!(identity, "close requested but no channel is open");
                return;
            }
            Some(channel) if channel.identity != identity => {
                warn!(
                    "close for {identity} ignored; channel belongs to {}",
                    channel.identity
                );
                return;
            }
            Some(_) => {}
        }

        if let Some(channel) = live.take() {
            self.teardown(channel).await;
        }
    }

    /// Sends an application event on the live channel.
    ///
    /// # Errors
    ///
    /// [`ChannelError::NotConnected`] when no channel is connected, or the
    /// sender's error if the write fails.
    pub async fn emit(&self, kind: impl Into<String>, payload: Value) -> Result<(), ChannelError> {
        let sender = {
            let live = self.live.lock().await;
            match live.as_ref() {
                Some(channel) if self.state().is_connected() => Arc::clone(&channel.sender),
                _ => return Err(ChannelError::NotConnected),
            }
        };
        let event = OutboundEvent::Custom {
            kind: kind.into(),
            payload,
        };
        debug!(kind = event.kind(), "emitting event");
        sender.send(event).await
    }

    async fn teardown(&self, channel: LiveChannel) {
        let was_connected = self.state().is_connected()
            && self.generation.load(Ordering::SeqCst) == channel.generation;

        // Silence the reader before touching the socket.
        self.generation.fetch_add(1, Ordering::SeqCst);

        if was_connected {
            let unregister =
                OutboundEvent::unregister(channel.identity.as_str(), channel.connection_id.as_str());
            match tokio::time::timeout(self.config.unregister_grace, channel.sender.send(unregister))
                .await
            {
                Ok(Ok(())) => debug!(identity = %channel.identity, "unregistered"),
                Ok(Err(e)) => debug!(identity = %channel.identity, "unregister failed: {e}"),
                Err(_) => debug!(identity = %channel.identity, "unregister timed out"),
            }
        }

        if tokio::time::timeout(self.config.unregister_grace, channel.sender.close())
            .await
            .is_err()
        {
            debug!(identity = %channel.identity, "socket close timed out");
        }
        channel.reader.abort();
        self.state.send_replace(ChannelState::Disconnected);

        if was_connected {
            self.bus.publish_lifecycle(&ConnectionEvent::Disconnected {
                reason: DisconnectReason::ClosedByClient,
            });
        }
        info!(identity = %channel.identity, "realtime channel closed");
    }
}

/// Reader task: dispatches inbound events in order until the transport ends.
async fn read_signals(
    mut signals: mpsc::Receiver<TransportSignal>,
    bus: Arc<EventBus>,
    state: Arc<watch::Sender<ChannelState>>,
    current: Arc<AtomicU64>,
    generation: u64,
) {
    let reason = loop {
        match signals.recv().await {
            Some(TransportSignal::Event(event)) => {
                let handled = bus.dispatch(&event);
                debug!(kind = %event.kind, handled, "inbound event dispatched");
            }
            Some(TransportSignal::Closed { reason }) => break reason,
            None => break "transport stream ended".to_string(),
        }
    };

    let dropped = state.send_if_modified(|s| {
        if current.load(Ordering::SeqCst) == generation && s.is_connected() {
            *s = ChannelState::Disconnected;
            true
        } else {
            false
        }
    });
    if dropped {
        warn!("realtime channel dropped: {reason}");
        bus.publish_lifecycle(&ConnectionEvent::Disconnected {
            reason: DisconnectReason::TransportError(reason),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::socket::mock::MockChannelTransport;
    use serde_json::json;
    use shop_core::OrderStatusChanged;
    use std::sync::Mutex as StdMutex;

    fn manager_with(transport: Arc<MockChannelTransport>) -> ConnectionManager {
        ConnectionManager::new(
            transport,
            Arc::new(EventBus::new()),
            ConnectionConfig::default(),
        )
    }

    fn lifecycle_log(manager: &ConnectionManager) -> Arc<StdMutex<Vec<ConnectionEvent>>> {
        let log = Arc::new(StdMutex::new(Vec::new()));
        let l = Arc::clone(&log);
        manager
            .bus()
            .on_lifecycle(move |e| l.lock().unwrap().push(e.clone()));
        log
    }

    // ── open ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_open_connects_and_registers_user() {
        // Arrange
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));

        // Act
        let state = manager.open("u1").await;

        // Assert
        assert_eq!(
            state,
            ChannelState::Connected {
                identity: "u1".into(),
                connection_id: "mock-conn-1".into()
            }
        );
        let link = transport.last_link().unwrap();
        assert_eq!(link.sent(), vec![OutboundEvent::register("u1", "mock-conn-1")]);
    }

    #[tokio::test]
    async fn test_double_open_same_identity_connects_once() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));

        manager.open("u1").await;
        let second = manager.open("u1").await;

        assert!(second.is_connected());
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_opens_connect_once() {
        let transport =
            Arc::new(MockChannelTransport::new().with_connect_delay(Duration::from_millis(20)));
        let manager = Arc::new(manager_with(Arc::clone(&transport)));

        let a = tokio::spawn({
            let m = Arc::clone(&manager);
            async move { m.open("u1").await }
        });
        let b = tokio::spawn({
            let m = Arc::clone(&manager);
            async move { m.open("u1").await }
        });

        assert!(a.await.unwrap().is_connected());
        assert!(b.await.unwrap().is_connected());
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_open_failure_leaves_disconnected_and_reports() {
        let transport = Arc::new(MockChannelTransport::failing());
        let manager = manager_with(Arc::clone(&transport));
        let log = lifecycle_log(&manager);

        let state = manager.open("u1").await;

        assert_eq!(state, ChannelState::Disconnected);
        assert_eq!(manager.state(), ChannelState::Disconnected);
        assert!(matches!(
            log.lock().unwrap().as_slice(),
            [ConnectionEvent::ConnectFailed { .. }]
        ));
    }

    #[tokio::test]
    async fn test_open_for_other_identity_replaces_channel() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));

        manager.open("u1").await;
        let state = manager.open("u2").await;

        assert_eq!(state.identity(), Some("u2"));
        let first = transport.link(0).unwrap();
        assert!(first.is_closed());
        assert_eq!(
            first.sent().last(),
            Some(&OutboundEvent::unregister("u1", "mock-conn-1"))
        );
        assert_eq!(transport.connect_count(), 2);
    }

    // ── close ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_close_unregisters_and_disconnects() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        let log = lifecycle_log(&manager);
        manager.open("u1").await;

        manager.close("u1").await;

        let link = transport.last_link().unwrap();
        assert_eq!(
            link.sent(),
            vec![
                OutboundEvent::register("u1", "mock-conn-1"),
                OutboundEvent::unregister("u1", "mock-conn-1"),
            ]
        );
        assert!(link.is_closed());
        assert_eq!(manager.state(), ChannelState::Disconnected);
        assert_eq!(
            log.lock().unwrap().last(),
            Some(&ConnectionEvent::Disconnected {
                reason: DisconnectReason::ClosedByClient
            })
        );
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        manager.open("u1").await;

        manager.close("u1").await;
        manager.close("u1").await;

        assert_eq!(manager.state(), ChannelState::Disconnected);
        assert_eq!(transport.last_link().unwrap().sent().len(), 2);
    }

    #[tokio::test]
    async fn test_close_for_other_identity_is_ignored() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        manager.open("u1").await;

        manager.close("intruder").await;

        assert!(manager.state().is_connected());
    }

    #[tokio::test]
    async fn test_close_then_open_reconnects() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));

        manager.open("u1").await;
        manager.close("u1").await;
        let state = manager.open("u1").await;

        assert!(state.is_connected());
        assert_eq!(transport.connect_count(), 2);
    }

    #[tokio::test]
    async fn test_close_completes_when_unregister_fails() {
        let transport = Arc::new(MockChannelTransport::new().with_failing_sends());
        let manager = manager_with(Arc::clone(&transport));
        manager.open("u1").await;

        manager.close("u1").await;

        assert_eq!(manager.state(), ChannelState::Disconnected);
    }

    // ── dispatch and drops ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_inbound_events_dispatch_in_arrival_order() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.bus().on_event::<OrderStatusChanged, _>(move |e| {
            let _ = tx.send(e.order_id);
        });
        manager.open("u1").await;
        let link = transport.last_link().unwrap();

        for id in ["O1", "O2", "O3"] {
            link.push_event("orderStatusChanged", json!({"orderId": id, "status": "confirmed"}))
                .await;
        }

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap());
        }
        assert_eq!(seen, vec!["O1", "O2", "O3"]);
    }

    #[tokio::test]
    async fn test_panicking_handler_keeps_channel_usable() {
        // Arrange
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.bus().on_event::<OrderStatusChanged, _>(move |e| {
            if e.order_id == "boom" {
                panic!("handler bug");
            }
            let _ = tx.send(e.order_id);
        });
        manager.open("u1").await;
        let link = transport.last_link().unwrap();

        // Act
        link.push_event("orderStatusChanged", json!({"orderId": "boom", "status": "x"}))
            .await;
        let delivered = link
            .push_event("orderStatusChanged", json!({"orderId": "ok", "status": "x"}))
            .await;

        // Assert
        assert!(delivered);
        assert_eq!(rx.recv().await.unwrap(), "ok");
        assert!(manager.state().is_connected());
        manager.open("u1").await;
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_drop_reports_disconnected_without_reconnect() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        let (tx, mut rx) = mpsc::unbounded_channel();
        manager.bus().on_lifecycle(move |e| {
            let _ = tx.send(e.clone());
        });
        manager.open("u1").await;
        let _connected = rx.recv().await;

        transport
            .last_link()
            .unwrap()
            .drop_connection("server went away")
            .await;

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ConnectionEvent::Disconnected {
                reason: DisconnectReason::TransportError("server went away".into())
            }
        );
        assert_eq!(manager.state(), ChannelState::Disconnected);
        assert_eq!(transport.connect_count(), 1);
    }

    #[tokio::test]
    async fn test_open_after_drop_reconnects() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        let mut state_rx = manager.subscribe();
        manager.open("u1").await;

        transport.last_link().unwrap().drop_connection("reset").await;
        state_rx
            .wait_for(|s| *s == ChannelState::Disconnected)
            .await
            .unwrap();
        let state = manager.open("u1").await;

        assert!(state.is_connected());
        assert_eq!(transport.connect_count(), 2);
    }

    // ── emit ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_emit_requires_connection() {
        let manager = manager_with(Arc::new(MockChannelTransport::new()));

        let result = manager.emit("typing", json!({})).await;

        assert!(matches!(result, Err(ChannelError::NotConnected)));
    }

    #[tokio::test]
    async fn test_emit_sends_custom_event() {
        let transport = Arc::new(MockChannelTransport::new());
        let manager = manager_with(Arc::clone(&transport));
        manager.open("u1").await;

        manager.emit("joinRoom", json!({"room": "r1"})).await.unwrap();

        assert_eq!(
            transport.last_link().unwrap().sent().last(),
            Some(&OutboundEvent::Custom {
                kind: "joinRoom".into(),
                payload: json!({"room": "r1"})
            })
        );
    }
}
