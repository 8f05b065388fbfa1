//! Message queue presenter: shows transient in-app messages one at a time.
//!
//! # Lifecycle of one message
//!
//! ```text
//! enqueue ─► [FIFO] ─► pop ─► Showing ─► appear (transition)
//!                                           │
//!                                        dwell (duration, not cancellable)
//!                                           │
//!                                        disappear (transition) ─► Idle ─► pop next
//! ```
//!
//! A single drain task runs while the queue is non-empty.  The pop and the
//! switch to `Showing` happen under the same lock that guards `enqueue`, so
//! a message enqueued at any moment is either picked up by the running drain
//! task or starts a new one; it is never stranded and never shown twice.
//! A surface that panics is logged and the schedule carries on.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use shop_core::domain::message::DEFAULT_DWELL;
use shop_core::{PendingMessage, PresenterState};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Default length of the appear and disappear transitions.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Where messages are actually rendered (a banner, a log line, a test recorder).
pub trait MessageSurface: Send + Sync {
    /// Start showing `message`.
    fn appear(&self, message: &PendingMessage);
    /// Stop showing `message`.
    fn disappear(&self, message: &PendingMessage);
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Dwell used by [`MessageQueue::enqueue_default`].
    pub default_duration: Duration,
    /// Length of each of the appear and disappear transitions.
    pub transition: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_DWELL,
            transition: DEFAULT_TRANSITION,
        }
    }
}

#[derive(Default)]
struct Pending {
    queue: VecDeque<PendingMessage>,
    draining: bool,
}

struct Inner {
    config: QueueConfig,
    surface: Arc<dyn MessageSurface>,
    pending: Mutex<Pending>,
    state: watch::Sender<PresenterState>,
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cheap to clone; all clones share one queue.
#[derive(Clone)]
pub struct MessageQueue {
    inner: Arc<Inner>,
}

impl MessageQueue {
    pub fn new(config: QueueConfig, surface: Arc<dyn MessageSurface>) -> Self {
        let (state, _) = watch::channel(PresenterState::idle());
        Self {
            inner: Arc::new(Inner {
                config,
                surface,
                pending: Mutex::new(Pending::default()),
                state,
            }),
        }
    }

    /// Queues `text` to be shown for at least `duration`.
    ///
    /// Never fails and never blocks.  Must be called from within a Tokio
    /// runtime for the message to start draining; outside one it stays queued
    /// until the next call made inside a runtime.
    pub fn enqueue(&self, text: impl Into<String>, duration: Duration) {
        let message = PendingMessage::new(text, duration);
        debug!(text = %message.text, ?duration, "message queued");

        let mut pending = self.inner.pending();
        pending.queue.push_back(message);
        if pending.draining {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                pending.draining = true;
                handle.spawn(drain(Arc::clone(&self.inner)));
            }
            Err(_) => warn!("message queued outside a runtime; it will show on the next enqueue"),
        }
    }

    /// Queues `text` with the configured default dwell.
    pub fn enqueue_default(&self, text: impl Into<String>) {
        self.enqueue(text, self.inner.config.default_duration);
    }

    pub fn state(&self) -> PresenterState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PresenterState> {
        self.inner.state.subscribe()
    }

    /// Messages waiting behind the visible one.
    pub fn pending_len(&self) -> usize {
        self.inner.pending().queue.len()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.inner.config
    }
}

/// Shows queued messages back to back until the queue is empty.
async fn drain(inner: Arc<Inner>) {
    loop {
        let message = {
            let mut pending = inner.pending();
            match pending.queue.pop_front() {
                Some(message) => {
                    inner.state.send_replace(PresenterState::showing(message.clone()));
                    message
                }
                None => {
                    pending.draining = false;
                    return;
                }
            }
        };

        info!(text = %message.text, "showing message");
        guarded("appear", &message, || inner.surface.appear(&message));
        tokio::time::sleep(inner.config.transition).await;
        tokio::time::sleep(message.duration).await;
        guarded("disappear", &message, || inner.surface.disappear(&message));
        tokio::time::sleep(inner.config.transition).await;

        inner.state.send_replace(PresenterState::idle());
        debug!(text = %message.text, "message dismissed");
    }
}

/// Runs a surface call; a panicking surface must not stall the queue.
fn guarded(action: &str, message: &PendingMessage, call: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(call)).is_err() {
        error!(action, text = %message.text, "message surface panicked");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
