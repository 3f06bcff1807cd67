//! Ticket ledger that fails on demand.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatline_core::{
    MarkCancelled, NewTicket, RouteId, StorageError, Ticket, TicketId, TicketLedger,
};
use seatline_reservation::InMemoryTicketLedger;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// [`InMemoryTicketLedger`] with injectable write failures.
///
/// Reads always succeed so tests can inspect state after a failure.
#[derive(Debug, Default)]
pub struct FlakyLedger {
    inner: InMemoryTicketLedger,
    failing_creates: AtomicUsize,
    failing_cancels: AtomicBool,
    create_attempts: AtomicUsize,
}

impl FlakyLedger {
    /// Creates a ledger that succeeds until told otherwise
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls to `create` fail
    pub fn fail_next_creates(&self, count: usize) {
        self.failing_creates.store(count, Ordering::SeqCst);
    }

    /// Makes `mark_cancelled` fail until switched off
    pub fn fail_cancels(&self, failing: bool) {
        self.failing_cancels.store(failing, Ordering::SeqCst);
    }

    /// Number of `create` calls, failed ones included
    #[must_use]
    pub fn create_attempts(&self) -> usize {
        self.create_attempts.load(Ordering::SeqCst)
    }

    /// Number of tickets stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no ticket is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl TicketLedger for FlakyLedger {
    async fn create(&self, ticket: NewTicket) -> Result<TicketId, StorageError> {
        self.create_attempts.fetch_add(1, Ordering::SeqCst);
        let fail = self
            .failing_creates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(StorageError::Unavailable("ledger write failed".to_string()));
        }
        self.inner.create(ticket).await
    }

    async fn mark_cancelled(
        &self,
        id: TicketId,
        at: DateTime<Utc>,
    ) -> Result<MarkCancelled, StorageError> {
        if self.failing_cancels.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("ledger write failed".to_string()));
        }
        self.inner.mark_cancelled(id, at).await
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>, StorageError> {
        self.inner.get(id).await
    }

    async fn list_by_route(&self, route_id: RouteId) -> Result<Vec<Ticket>, StorageError> {
        self.inner.list_by_route(route_id).await
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, StorageError> {
        self.inner.list_all().await
    }
}
