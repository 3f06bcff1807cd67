//! Notification sink shims.
//!
//! The real delivery channel is external. These sinks let the server run on
//! its own: one only logs, the other also keeps a per-recipient inbox that
//! callers can read back.

use async_trait::async_trait;
use seatline_core::{CallerId, Notification, NotificationSink, NotifyError};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::info;

/// Sink that writes notifications to the log and drops them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    /// Creates a logging sink
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LogNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            recipient = %notification.recipient,
            message = %notification.message,
            "Notification"
        );
        Ok(())
    }
}

/// Sink that logs and stores notifications per recipient, newest last.
#[derive(Debug, Default)]
pub struct InboxNotificationSink {
    inboxes: RwLock<HashMap<CallerId, Vec<Notification>>>,
}

impl InboxNotificationSink {
    /// Creates an empty inbox
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications addressed to `recipient`, oldest first
    #[must_use]
    pub fn notifications_for(&self, recipient: CallerId) -> Vec<Notification> {
        self.inboxes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&recipient)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl NotificationSink for InboxNotificationSink {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            recipient = %notification.recipient,
            message = %notification.message,
            "Notification stored"
        );
        self.inboxes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(notification.recipient)
            .or_default()
            .push(notification);
        Ok(())
    }
}
