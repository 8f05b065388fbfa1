//! Recording push provider for tests.
//!
//! Behaves like a real provider whose permission answer is fixed at
//! construction.  Every scheduled notification and configured channel is
//! kept in memory for assertions.
//!
//! # Failure flags
//!
//! `fail_token` and `fail_schedule` make the corresponding call return a
//! [`PushError`], to exercise the presenter's error paths.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::application::notification_presenter::{
    ChannelSettings, LocalNotification, PermissionStatus, PushError, PushProvider,
};

fn locked<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct RecordingPushProvider {
    /// Answer to both the permission query and the permission request.
    pub permission: PermissionStatus,
    pub requires_channels: bool,
    pub fail_token: bool,
    pub fail_schedule: bool,
    scheduled: Mutex<Vec<LocalNotification>>,
    channels: Mutex<Vec<ChannelSettings>>,
    permission_requests: Mutex<u32>,
}

impl RecordingPushProvider {
    pub fn with_permission(permission: PermissionStatus) -> Self {
        Self {
            permission,
            requires_channels: false,
            fail_token: false,
            fail_schedule: false,
            scheduled: Mutex::new(Vec::new()),
            channels: Mutex::new(Vec::new()),
            permission_requests: Mutex::new(0),
        }
    }

    pub fn granted() -> Self {
        Self::with_permission(PermissionStatus::Granted)
    }

    pub fn denied() -> Self {
        Self::with_permission(PermissionStatus::Denied)
    }

    /// Notifications scheduled so far, in order.
    pub fn scheduled(&self) -> Vec<LocalNotification> {
        locked(&self.scheduled).clone()
    }

    pub fn channels(&self) -> Vec<ChannelSettings> {
        locked(&self.channels).clone()
    }

    pub fn permission_requests(&self) -> u32 {
        *locked(&self.permission_requests)
    }
}

#[async_trait]
impl PushProvider for RecordingPushProvider {
    async fn permission_status(&self) -> Result<PermissionStatus, PushError> {
        Ok(self.permission)
    }

    async fn request_permission(&self) -> Result<PermissionStatus, PushError> {
        *locked(&self.permission_requests) += 1;
        Ok(self.permission)
    }

    async fn push_token(&self) -> Result<String, PushError> {
        if self.fail_token {
            return Err(PushError::Token("mock failure".into()));
        }
        Ok("MockPushToken[0]".to_string())
    }

    fn requires_channels(&self) -> bool {
        self.requires_channels
    }

    async fn configure_channel(&self, settings: ChannelSettings) -> Result<(), PushError> {
        locked(&self.channels).push(settings);
        Ok(())
    }

    async fn schedule(&self, notification: LocalNotification) -> Result<(), PushError> {
        if self.fail_schedule {
            return Err(PushError::Schedule("mock failure".into()));
        }
        locked(&self.scheduled).push(notification);
        Ok(())
    }
}
