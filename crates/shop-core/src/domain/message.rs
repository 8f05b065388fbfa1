//! In-app transient messages ("toasts") and the presenter's visible state.

use std::time::Duration;

/// Default dwell time for an in-app message.
pub const DEFAULT_DWELL: Duration = Duration::from_millis(2000);

/// A message waiting to be shown, or currently shown.
///
/// Created by whoever asks for a message to be displayed; never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub text: String,
    /// Minimum time the message stays fully visible.
    pub duration: Duration,
}

impl PendingMessage {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            duration,
        }
    }
}

/// The two states of the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterPhase {
    Idle,
    Showing,
}

/// Snapshot of what the presenter is displaying.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenterState {
    pub visible: bool,
    pub current: Option<PendingMessage>,
}

impl PresenterState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn showing(message: PendingMessage) -> Self {
        Self {
            visible: true,
            current: Some(message),
        }
    }

    pub fn phase(&self) -> PresenterPhase {
        if self.visible {
            PresenterPhase::Showing
        } else {
            PresenterPhase::Idle
        }
    }
}
