//! Push notification adapters.
//!
//! The headless binary has no OS notification centre, so [`LogPushProvider`]
//! grants permission, mints a local token and writes notifications to the
//! log.  A phone build would put the platform SDK behind the same trait.

pub mod mock;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::notification_presenter::{
    AlertSink, ChannelSettings, LocalNotification, PermissionStatus, PushError, PushProvider,
};

/// A push provider that logs instead of notifying.
#[derive(Debug)]
pub struct LogPushProvider {
    token: String,
}

impl LogPushProvider {
    pub fn new() -> Self {
        Self {
            token: format!("LocalPushToken[{}]", Uuid::new_v4()),
        }
    }
}

impl Default for LogPushProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushProvider for LogPushProvider {
    async fn permission_status(&self) -> Result<PermissionStatus, PushError> {
        Ok(PermissionStatus::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, PushError> {
        Ok(PermissionStatus::Granted)
    }

    async fn push_token(&self) -> Result<String, PushError> {
        Ok(self.token.clone())
    }

    fn requires_channels(&self) -> bool {
        false
    }

    async fn configure_channel(&self, settings: ChannelSettings) -> Result<(), PushError> {
        info!(channel = %settings.id, "notification channel configured");
        Ok(())
    }

    async fn schedule(&self, notification: LocalNotification) -> Result<(), PushError> {
        info!(target: "shop_client::notification", "{}: {}", notification.title, notification.body);
        Ok(())
    }
}

/// Logs alerts at `warn` level.
#[derive(Debug, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, message: &str) {
        warn!(target: "shop_client::alert", "{message}");
    }
}
