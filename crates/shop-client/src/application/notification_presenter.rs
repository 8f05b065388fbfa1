//! Notification presenter: OS-level notifications for important events.
//!
//! `init()` negotiates permission and fetches the device push token once per
//! process.  Until it has succeeded, `display()` is a silent no-op.  Nothing
//! in here ever returns an error to the caller: provider failures are logged.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Title used by [`NotificationPresenter::display_default`].
pub const DEFAULT_TITLE: &str = "New notification";
/// Body used by [`NotificationPresenter::display_default`].
pub const DEFAULT_BODY: &str = "You have a new notification";
/// Shown to the user when notification permission is refused.
pub const PERMISSION_DENIED_ALERT: &str = "Sorry, we can't send you notifications!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importance {
    Min,
    Low,
    Default,
    High,
    Max,
}

/// Notification channel definition (Android-style platforms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    pub id: String,
    pub name: String,
    pub importance: Importance,
    /// Alternating off/on vibration durations in milliseconds.
    pub vibration_pattern: Vec<u64>,
    /// `#AARRGGBB`
    pub light_color: String,
}

impl ChannelSettings {
    /// The app's single `default` channel.
    pub fn default_channel() -> Self {
        Self {
            id: "default".to_string(),
            name: "default".to_string(),
            importance: Importance::Max,
            vibration_pattern: vec![0, 250, 250, 250],
            light_color: "#FF231F7C".to_string(),
        }
    }
}

/// An immediate local notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("permission query failed: {0}")]
    Permission(String),

    #[error("push token unavailable: {0}")]
    Token(String),

    #[error("notification channel setup failed: {0}")]
    Channel(String),

    #[error("could not schedule notification: {0}")]
    Schedule(String),
}

/// The platform's notification service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn permission_status(&self) -> Result<PermissionStatus, PushError>;
    async fn request_permission(&self) -> Result<PermissionStatus, PushError>;
    async fn push_token(&self) -> Result<String, PushError>;
    /// Whether notifications must be posted to a configured channel.
    fn requires_channels(&self) -> bool;
    async fn configure_channel(&self, settings: ChannelSettings) -> Result<(), PushError>;
    async fn schedule(&self, notification: LocalNotification) -> Result<(), PushError>;
}

/// Blocking user-facing alert (a dialog on a phone, a log line headless).
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Terminal result of [`NotificationPresenter::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Ready { token: String },
    PermissionDenied,
    /// The permission state could not be determined.
    PermissionUnavailable { reason: String },
    TokenUnavailable { reason: String },
}

pub struct NotificationPresenter {
    provider: Arc<dyn PushProvider>,
    alerts: Arc<dyn AlertSink>,
    outcome: OnceCell<InitOutcome>,
}

impl NotificationPresenter {
    pub fn new(provider: Arc<dyn PushProvider>, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            provider,
            alerts,
            outcome: OnceCell::new(),
        }
    }

    /// Sets up notifications.  Runs once per presenter; later and concurrent
    /// callers receive the same outcome.
    pub async fn init(&self) -> InitOutcome {
        self.outcome
            .get_or_init(|| self.negotiate())
            .await
            .clone()
    }

    /// The device push token, once `init` has succeeded.
    pub fn push_token(&self) -> Option<String> {
        match self.outcome.get() {
            Some(InitOutcome::Ready { token }) => Some(token.clone()),
            _ => None,
        }
    }

    /// Shows a local notification immediately.  No-op before a token exists.
    pub async fn display(&self, title: &str, body: &str) {
        if self.push_token().is_none() {
            debug!(title, "no push token; notification skipped");
            return;
        }
        let notification = LocalNotification {
            title: title.to_string(),
            body: body.to_string(),
        };
        match self.provider.schedule(notification).await {
            Ok(()) => info!(title, "notification displayed"),
            Err(e) => warn!(title, "notification failed: {e}"),
        }
    }

    pub async fn display_default(&self) {
        self.display(DEFAULT_TITLE, DEFAULT_BODY).await;
    }

    async fn negotiate(&self) -> InitOutcome {
        let status = match self.current_or_requested_permission().await {
            Ok(status) => status,
            Err(e) => {
                warn!("notification permission unavailable: {e}");
                return InitOutcome::PermissionUnavailable {
                    reason: e.to_string(),
                };
            }
        };

        if status != PermissionStatus::Granted {
            warn!(?status, "notification permission refused");
            self.alerts.alert(PERMISSION_DENIED_ALERT);
            return InitOutcome::PermissionDenied;
        }

        let token = match self.provider.push_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("{e}");
                return InitOutcome::TokenUnavailable {
                    reason: e.to_string(),
                };
            }
        };
        info!("push token obtained");

        if self.provider.requires_channels() {
            match self
                .provider
                .configure_channel(ChannelSettings::default_channel())
                .await
            {
                Ok(()) => debug!("default notification channel configured"),
                Err(e) => warn!("{e}"),
            }
        }

        InitOutcome::Ready { token }
    }

    async fn current_or_requested_permission(&self) -> Result<PermissionStatus, PushError> {
        let existing = self.provider.permission_status().await?;
        if existing == PermissionStatus::Granted {
            return Ok(existing);
        }
        debug!(?existing, "requesting notification permission");
        self.provider.request_permission().await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
