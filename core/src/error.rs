//! Error taxonomy for the reservation core.
//!
//! Expected business outcomes (insufficient seats, already cancelled, not
//! found on book/cancel) are result variants in [`crate::outcome`], not errors.
//! Everything here is either a rejected request or a genuine fault.

use crate::types::{RouteId, TicketId};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, ReservationError>;

/// The ticket ledger's storage could not complete a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backing store is unreachable.
    #[error("Ticket storage unavailable: {0}")]
    Unavailable(String),

    /// Backing store refused the write.
    #[error("Ticket storage rejected the write: {0}")]
    Rejected(String),
}

/// An inventory invariant would be violated. Never corrected silently.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// Releasing seats would push availability above capacity.
    #[error(
        "Releasing {releasing} seats on route {route_id} would exceed capacity \
         ({available} available of {total_seats})"
    )]
    SeatOverflow {
        /// Route being released
        route_id: RouteId,
        /// Availability before the release
        available: u32,
        /// Seats being returned
        releasing: u32,
        /// Route capacity
        total_seats: u32,
    },

    /// A ticket references a route the catalog does not hold.
    #[error("Ticket {ticket_id} references unknown route {route_id}")]
    DanglingTicket {
        /// Ticket holding the reference
        ticket_id: TicketId,
        /// Missing route
        route_id: RouteId,
    },

    /// Seats were reserved but could not be given back after a failed booking.
    #[error("Rollback of {seats} seats on route {route_id} failed: {reason}")]
    RollbackFailed {
        /// Route the seats were taken from
        route_id: RouteId,
        /// Seats that leaked
        seats: u32,
        /// Underlying failure
        reason: String,
    },
}

/// Structural problems with a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Seat count must be at least one.
    #[error("Seat count must be greater than zero")]
    ZeroSeats,

    /// Seat count exceeds the per-booking limit.
    #[error("Cannot book more than {max} seats at once (requested: {requested})")]
    TooManySeats {
        /// Requested seats
        requested: u32,
        /// Configured limit
        max: u32,
    },

    /// A required text field was blank.
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// Route capacity must be at least one.
    #[error("Route capacity must be greater than zero")]
    ZeroCapacity,

    /// Seats times fare does not fit in the money type.
    #[error("Total fare overflows for {seats} seats")]
    FareOverflow {
        /// Requested seats
        seats: u32,
    },
}

/// Notification delivery failed. Logged by the engine, never propagated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Sink refused the message.
    #[error("Notification rejected: {0}")]
    Rejected(String),

    /// Sink could not be reached.
    #[error("Notification sink unreachable: {0}")]
    Unreachable(String),

    /// Delivery did not finish in time.
    #[error("Notification timed out after {0:?}")]
    TimedOut(Duration),
}

/// Caller identity could not be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No credentials were presented.
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials do not match any known caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Directory backend failed.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Failures of reservation engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// Malformed request.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller may not perform this operation.
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Why access was denied
        reason: String,
    },

    /// Route does not exist (lookups and administrative operations).
    #[error("Route {0} not found")]
    RouteNotFound(RouteId),

    /// Ticket does not exist (lookups).
    #[error("Ticket {0} not found")]
    TicketNotFound(TicketId),

    /// Ticket storage failed; any partial seat reservation was rolled back.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Inventory invariant violation.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),
}

impl ReservationError {
    /// Whether this failure warrants operator alerting.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Consistency(_))
    }
}
