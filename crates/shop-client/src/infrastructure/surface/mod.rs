//! Message surfaces: where in-app messages end up.
//!
//! The headless binary has no screen, so [`LogSurface`] renders each message
//! as a log line.  [`mock::RecordingSurface`] records timestamps for tests.

pub mod mock;

use shop_core::PendingMessage;
use tracing::info;

use crate::application::message_queue::MessageSurface;

/// Writes every appear/disappear to the log.
#[derive(Debug, Default)]
pub struct LogSurface;

impl MessageSurface for LogSurface {
    fn appear(&self, message: &PendingMessage) {
        info!(target: "shop_client::toast", duration_ms = message.duration.as_millis() as u64, "▶ {}", message.text);
    }

    fn disappear(&self, message: &PendingMessage) {
        info!(target: "shop_client::toast", "◀ {}", message.text);
    }
}
