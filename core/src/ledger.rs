//! Ticket ledger trait.
//!
//! The ledger persists tickets and guards their single status transition.
//! Implementations must make [`TicketLedger::mark_cancelled`] an atomic
//! compare-and-set: of two concurrent calls for one ticket exactly one sees
//! [`MarkCancelled::Cancelled`].

use crate::error::StorageError;
use crate::types::{NewTicket, RouteId, Ticket, TicketId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Outcome of a cancel compare-and-set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkCancelled {
    /// Status moved `Booked -> Cancelled`; carries the updated ticket
    Cancelled(Ticket),
    /// Ticket was already cancelled; nothing changed
    AlreadyCancelled,
    /// No such ticket
    NotFound,
}

/// Ticket storage.
#[async_trait]
pub trait TicketLedger: Send + Sync {
    /// Store a new ticket with status `Booked` and return its fresh ID.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the ticket could not be stored.
    async fn create(&self, ticket: NewTicket) -> Result<TicketId, StorageError>;

    /// Flip a ticket from `Booked` to `Cancelled`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    async fn mark_cancelled(
        &self,
        id: TicketId,
        at: DateTime<Utc>,
    ) -> Result<MarkCancelled, StorageError>;

    /// Fetch one ticket.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    async fn get(&self, id: TicketId) -> Result<Option<Ticket>, StorageError>;

    /// Snapshot of a route's tickets, ascending by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    async fn list_by_route(&self, route_id: RouteId) -> Result<Vec<Ticket>, StorageError>;

    /// Snapshot of every ticket, ascending by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if storage fails.
    async fn list_all(&self) -> Result<Vec<Ticket>, StorageError>;
}
