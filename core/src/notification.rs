//! Outbound notifications for booking and cancellation events.

use crate::error::NotifyError;
use crate::types::CallerId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message addressed to one directory caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Addressee
    pub recipient: CallerId,
    /// Human-readable text
    pub message: String,
    /// When the event happened
    pub created_at: DateTime<Utc>,
}

/// Notification sink.
///
/// Delivery is fire-and-forget from the engine's point of view: a failure is
/// logged and counted, never returned to the booking caller.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the sink rejects or cannot reach the recipient.
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}
