//! Recording message surface for tests.
//!
//! Each call is stored with the Tokio clock's [`Instant`], so tests running
//! on a paused clock (`#[tokio::test(start_paused = true)]`) can assert exact
//! display timings without waiting in real time.

use std::sync::{Mutex, MutexGuard, PoisonError};

use shop_core::PendingMessage;
use tokio::time::Instant;

use crate::application::message_queue::MessageSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    Appear,
    Disappear,
}

#[derive(Debug, Clone)]
pub struct SurfaceEntry {
    pub at: Instant,
    pub action: SurfaceAction,
    pub text: String,
}

/// Records every appear/disappear call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    entries: Mutex<Vec<SurfaceEntry>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<SurfaceEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: SurfaceAction, message: &PendingMessage) {
        self.entries().push(SurfaceEntry {
            at: Instant::now(),
            action,
            text: message.text.clone(),
        });
    }

    /// Full call log.
    pub fn log(&self) -> Vec<SurfaceEntry> {
        self.entries().clone()
    }

    /// Texts of the messages that appeared, in display order.
    pub fn shown_texts(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter(|e| e.action == SurfaceAction::Appear)
            .map(|e| e.text.clone())
            .collect()
    }

    /// When `text` appeared and disappeared, if it has finished showing.
    pub fn window_of(&self, text: &str) -> Option<(Instant, Instant)> {
        let entries = self.entries();
        let appear = entries
            .iter()
            .find(|e| e.action == SurfaceAction::Appear && e.text == text)?
            .at;
        let disappear = entries
            .iter()
            .find(|e| e.action == SurfaceAction::Disappear && e.text == text)?
            .at;
        Some((appear, disappear))
    }
}

impl MessageSurface for RecordingSurface {
    fn appear(&self, message: &PendingMessage) {
        self.record(SurfaceAction::Appear, message);
    }

    fn disappear(&self, message: &PendingMessage) {
        self.record(SurfaceAction::Disappear, message);
    }
}
