//! Publish/subscribe registry for inbound channel events and connection
//! lifecycle events.
//!
//! Handlers are plain synchronous closures.  [`EventBus::dispatch`] calls
//! every handler registered for the event's kind, in registration order, on
//! the caller's task.  The registry lock is released before any handler runs,
//! so a handler may itself subscribe, unsubscribe or enqueue work.  A handler
//! that panics is logged and skipped; the remaining handlers still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shop_core::{ChannelEvent, InboundEvent};
use tracing::{debug, error, warn};

/// Handler for one inbound event kind.
pub type EventHandler = Arc<dyn Fn(&InboundEvent) + Send + Sync>;

/// Handler for connection lifecycle events.
pub type LifecycleHandler = Arc<dyn Fn(&ConnectionEvent) + Send + Sync>;

/// Token returned by every registration; pass it to [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Why a channel went down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// `close()` was called, or `open()` replaced the channel.
    ClosedByClient,
    /// The socket dropped or the server closed it.
    TransportError(String),
}

/// Connection lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected { connection_id: String },
    Disconnected { reason: DisconnectReason },
    ConnectFailed { reason: String },
}

#[derive(Default)]
struct Registry {
    events: Vec<(Subscription, String, EventHandler)>,
    lifecycle: Vec<(Subscription, LifecycleHandler)>,
}

#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_subscription(&self) -> Subscription {
        Subscription(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers `handler` for events named `kind`.
    pub fn on<F>(&self, kind: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&InboundEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscription();
        let kind = kind.into();
        debug!(%kind, "handler registered");
        self.registry().events.push((id, kind, Arc::new(handler)));
        id
    }

    /// Registers a handler that receives the decoded payload of `E`.
    ///
    /// Events whose payload does not decode are logged and skipped.
    pub fn on_event<E, F>(&self, handler: F) -> Subscription
    where
        E: ChannelEvent + 'static,
        F: Fn(E) + Send + Sync + 'static,
    {
        self.on(E::KIND, move |event: &InboundEvent| match event.decode::<E>() {
            Ok(payload) => handler(payload),
            Err(e) => warn!("dropping '{}' event: {e}", event.kind),
        })
    }

    /// Registers a lifecycle handler.
    pub fn on_lifecycle<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&ConnectionEvent) + Send + Sync + 'static,
    {
        let id = self.next_subscription();
        self.registry().lifecycle.push((id, Arc::new(handler)));
        id
    }

    /// Removes a registration.  Returns `false` if it was already gone.
    pub fn off(&self, subscription: Subscription) -> bool {
        let mut registry = self.registry();
        let before = registry.events.len() + registry.lifecycle.len();
        registry.events.retain(|(id, _, _)| *id != subscription);
        registry.lifecycle.retain(|(id, _)| *id != subscription);
        before != registry.events.len() + registry.lifecycle.len()
    }

    /// Delivers `event` to every handler registered for its kind.
    ///
    /// Returns the number of handlers that were called.
    pub fn dispatch(&self, event: &InboundEvent) -> usize {
        let handlers: Vec<EventHandler> = self
            .registry()
            .events
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, handler)| Arc::clone(handler))
            .collect();

        if handlers.is_empty() {
            debug!(kind = %event.kind, "no handler for inbound event");
        }
        for handler in &handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                error!(kind = %event.kind, "event handler panicked");
            }
        }
        handlers.len()
    }

    /// Delivers a lifecycle event to every lifecycle handler.
    pub fn publish_lifecycle(&self, event: &ConnectionEvent) {
        let handlers: Vec<LifecycleHandler> = self
            .registry()
            .lifecycle
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in &handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                error!(?event, "lifecycle handler panicked");
            }
        }
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: &str) -> usize {
        self.registry()
            .events
            .iter()
            .filter(|(_, k, _)| k == kind)
            .count()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
