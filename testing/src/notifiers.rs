//! Notification sinks with scripted behaviour.

use async_trait::async_trait;
use seatline_core::{CallerId, Notification, NotificationSink, NotifyError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Records every notification it accepts.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in delivery order
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages delivered to one recipient
    #[must_use]
    pub fn messages_for(&self, recipient: CallerId) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.recipient == recipient)
            .map(|n| n.message)
            .collect()
    }

    /// Number of deliveries
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing was delivered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
        Ok(())
    }
}

/// Rejects every notification and counts the attempts.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier {
    attempts: Arc<AtomicUsize>,
}

impl FailingNotifier {
    /// Creates a failing notifier
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notifications attempted
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for FailingNotifier {
    async fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Unreachable("mail relay down".to_string()))
    }
}

/// Sleeps before recording, to exercise the notification timeout.
#[derive(Debug, Clone)]
pub struct SlowNotifier {
    delay: Duration,
    inner: RecordingNotifier,
}

impl SlowNotifier {
    /// Creates a notifier that takes `delay` per delivery
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RecordingNotifier::new(),
        }
    }

    /// Deliveries that completed
    #[must_use]
    pub fn delivered(&self) -> Vec<Notification> {
        self.inner.notifications()
    }
}

#[async_trait]
impl NotificationSink for SlowNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        tokio::time::sleep(self.delay).await;
        self.inner.notify(notification).await
    }
}
