//! Domain types for the reservation core.
//!
//! Routes own a seat inventory; tickets record one booking against a route.
//! Identifiers are sequential so that ordering by id matches creation order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(u64);

impl RouteId {
    /// Creates a `RouteId` from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Unique identifier for a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a `TicketId` from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Identifier of an operator or administrator, as issued by the directory
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(u64);

impl CallerId {
    /// Creates a `CallerId` from its raw value
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (minor units to avoid floating point errors)
// ============================================================================

/// Represents money in minor currency units (cents, paise)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a `Money` value from major units with overflow checking
    #[must_use]
    pub const fn checked_from_major(major: u64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Returns the whole major units (rounded down)
    #[must_use]
    pub const fn major(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a seat count with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major(), self.0 % 100)
    }
}

// ============================================================================
// Route
// ============================================================================

/// Request to create a route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoute {
    /// Display name
    pub name: String,
    /// Origin
    pub source: String,
    /// Terminus
    pub destination: String,
    /// Distance, display only
    pub distance: String,
    /// Travel time, display only
    pub duration: String,
    /// Fare charged per seat
    pub fare_per_seat: Money,
    /// Seat capacity; `None` takes the configured default
    #[serde(default)]
    pub total_seats: Option<u32>,
}

/// A route and its seat inventory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route ID
    pub id: RouteId,
    /// Display name
    pub name: String,
    /// Origin
    pub source: String,
    /// Terminus
    pub destination: String,
    /// Distance, display only
    pub distance: String,
    /// Travel time, display only
    pub duration: String,
    /// Current fare per seat
    pub fare_per_seat: Money,
    /// Fixed capacity
    pub total_seats: u32,
    /// Seats not held by a booked ticket
    pub available_seats: u32,
}

impl Route {
    /// Seats currently held by booked tickets
    #[must_use]
    pub const fn booked_seats(&self) -> u32 {
        self.total_seats.saturating_sub(self.available_seats)
    }

    /// Whether every seat is taken
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available_seats == 0
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// Passenger contact details
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
}

/// Request to book seats on a route
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Route to book on
    pub route_id: RouteId,
    /// Who is travelling
    pub passenger: Passenger,
    /// Date of travel
    pub booking_date: NaiveDate,
    /// Number of seats
    pub seats: u32,
}

/// Ticket lifecycle status. The only transition is `Booked -> Cancelled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Seats are held
    Booked,
    /// Seats were returned to the route
    Cancelled,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "Booked"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Ticket fields supplied by the engine when booking
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTicket {
    /// Route the seats were taken from
    pub route_id: RouteId,
    /// Who is travelling
    pub passenger: Passenger,
    /// Date of travel
    pub booking_date: NaiveDate,
    /// Number of seats
    pub seats_booked: u32,
    /// Fare snapshot
    pub total_fare: Money,
    /// Submitting caller
    pub booked_by: CallerId,
    /// When the booking was made
    pub booked_at: DateTime<Utc>,
}

/// A booking record. Never deleted; cancellation only flips the status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket ID
    pub id: TicketId,
    /// Route the seats were taken from
    pub route_id: RouteId,
    /// Who is travelling
    pub passenger: Passenger,
    /// Date of travel
    pub booking_date: NaiveDate,
    /// Number of seats
    pub seats_booked: u32,
    /// Fare at booking time, never recomputed
    pub total_fare: Money,
    /// Current status
    pub status: TicketStatus,
    /// Submitting caller
    pub booked_by: CallerId,
    /// When the booking was made
    pub booked_at: DateTime<Utc>,
    /// When the ticket was cancelled
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Builds a booked ticket from its creation request
    #[must_use]
    pub fn booked(id: TicketId, new: NewTicket) -> Self {
        Self {
            id,
            route_id: new.route_id,
            passenger: new.passenger,
            booking_date: new.booking_date,
            seats_booked: new.seats_booked,
            total_fare: new.total_fare,
            status: TicketStatus::Booked,
            booked_by: new.booked_by,
            booked_at: new.booked_at,
            cancelled_at: None,
        }
    }

    /// Whether the ticket still holds seats
    #[must_use]
    pub fn is_booked(&self) -> bool {
        self.status == TicketStatus::Booked
    }
}
