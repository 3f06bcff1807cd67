//! Tagged results for the booking and cancellation operations.
//!
//! Callers are expected to branch on these; none of the variants is a fault.

use crate::types::{Money, RouteId, TicketId};
use serde::{Deserialize, Serialize};

/// Result of `book`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingResult {
    /// Seats were taken and a ticket issued
    Success {
        /// Issued ticket
        ticket_id: TicketId,
        /// Fare charged, frozen on the ticket
        total_fare: Money,
    },
    /// Not enough seats left; nothing was changed
    InsufficientSeats {
        /// Seats asked for
        requested: u32,
        /// Seats left when the request was evaluated
        available: u32,
    },
    /// No route with that ID
    RouteNotFound,
}

impl BookingResult {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::InsufficientSeats { .. } => "insufficient_seats",
            Self::RouteNotFound => "route_not_found",
        }
    }
}

/// Result of `cancel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CancelResult {
    /// Ticket cancelled and its seats returned
    Success {
        /// Cancelled ticket
        ticket_id: TicketId,
        /// Seats returned to the route
        seats_released: u32,
    },
    /// Ticket was cancelled earlier; no seats were returned this time
    AlreadyCancelled,
    /// No ticket with that ID
    TicketNotFound,
}

impl CancelResult {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::AlreadyCancelled => "already_cancelled",
            Self::TicketNotFound => "ticket_not_found",
        }
    }
}

/// Comparison of a route's seat counter against its booked tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAudit {
    /// Audited route
    pub route_id: RouteId,
    /// Route capacity
    pub total_seats: u32,
    /// Counter held by the catalog
    pub available_seats: u32,
    /// Sum of seats over booked tickets
    pub booked_seats: u32,
    /// Booked tickets counted
    pub booked_tickets: usize,
}

impl InventoryAudit {
    /// Availability implied by the ledger, `None` if tickets overbook the route
    #[must_use]
    pub const fn expected_available(&self) -> Option<u32> {
        self.total_seats.checked_sub(self.booked_seats)
    }

    /// Whether the catalog counter agrees with the ledger
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.expected_available() == Some(self.available_seats)
    }
}
