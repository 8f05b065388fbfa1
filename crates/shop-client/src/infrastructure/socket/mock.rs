//! In-memory channel transport for tests.
//!
//! Every successful `connect()` creates a [`MockLink`] that records what the
//! client sent and lets the test inject inbound events or simulate a dropped
//! socket.  Connection ids are `mock-conn-1`, `mock-conn-2`, ...
//!
//! # Usage in tests
//!
//! ```ignore
//! let transport = Arc::new(MockChannelTransport::new());
//! let manager = ConnectionManager::new(transport.clone(), bus, ConnectionConfig::default());
//!
//! manager.open("u1").await;
//! let link = transport.last_link().unwrap();
//! link.push_event("orderStatusChanged", json!({"orderId": "O1", "status": "delivered"})).await;
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use shop_core::{InboundEvent, OutboundEvent};
use tokio::sync::mpsc;

use crate::application::connection_manager::{
    ChannelError, ChannelLink, ChannelSender, ChannelTransport, TransportSignal,
};

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Test handle for one established mock connection.
#[derive(Clone)]
pub struct MockLink {
    pub connection_id: String,
    sent: Arc<Mutex<Vec<OutboundEvent>>>,
    closed: Arc<AtomicBool>,
    signals: mpsc::Sender<TransportSignal>,
}

impl MockLink {
    /// Everything the client sent on this link, in order.
    pub fn sent(&self) -> Vec<OutboundEvent> {
        locked(&self.sent).clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Delivers an inbound event.  Returns `false` if the reader is gone.
    pub async fn push_event(&self, kind: &str, payload: Value) -> bool {
        self.signals
            .send(TransportSignal::Event(InboundEvent::new(kind, payload)))
            .await
            .is_ok()
    }

    /// Simulates the server or network dropping the socket.
    pub async fn drop_connection(&self, reason: &str) -> bool {
        self.closed.store(true, Ordering::SeqCst);
        self.signals
            .send(TransportSignal::Closed {
                reason: reason.to_string(),
            })
            .await
            .is_ok()
    }
}

struct MockSender {
    sent: Arc<Mutex<Vec<OutboundEvent>>>,
    closed: Arc<AtomicBool>,
    fail_sends: bool,
}

#[async_trait]
impl ChannelSender for MockSender {
    async fn send(&self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.fail_sends {
            return Err(ChannelError::Send("mock failure".into()));
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::NotConnected);
        }
        locked(&self.sent).push(event);
        Ok(())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// A channel transport that never touches the network.
#[derive(Default)]
pub struct MockChannelTransport {
    connects: AtomicUsize,
    links: Mutex<Vec<MockLink>>,
    /// When `true`, `connect()` fails with [`ChannelError::Connect`].
    pub should_fail: bool,
    /// When `true`, every send on every link fails.
    pub fail_sends: bool,
    /// Simulated handshake latency.
    pub connect_delay: Option<Duration>,
}

impl MockChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn with_failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn with_connect_delay(mut self, delay: Duration) -> Self {
        self.connect_delay = Some(delay);
        self
    }

    /// Number of `connect()` calls, successful or not.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// The `index`-th link, in connection order.
    pub fn link(&self, index: usize) -> Option<MockLink> {
        locked(&self.links).get(index).cloned()
    }

    pub fn last_link(&self) -> Option<MockLink> {
        locked(&self.links).last().cloned()
    }
}

#[async_trait]
impl ChannelTransport for MockChannelTransport {
    async fn connect(&self) -> Result<ChannelLink, ChannelError> {
        let n = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.connect_delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(ChannelError::Connect {
                url: "mock://".into(),
                reason: "mock failure".into(),
            });
        }

        let (tx, rx) = mpsc::channel(64);
        let sent = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let connection_id = format!("mock-conn-{n}");

        locked(&self.links).push(MockLink {
            connection_id: connection_id.clone(),
            sent: Arc::clone(&sent),
            closed: Arc::clone(&closed),
            signals: tx,
        });

        Ok(ChannelLink {
            connection_id,
            sender: Arc::new(MockSender {
                sent,
                closed,
                fail_sends: self.fail_sends,
            }),
            signals: rx,
        })
    }
}
