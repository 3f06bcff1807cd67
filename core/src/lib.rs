//! # Seatline Core
//!
//! Domain types and collaborator traits for the Seatline reservation core.
//!
//! This crate holds everything the reservation engine and its transports
//! agree on, with no behaviour of its own:
//!
//! - **Types**: routes, tickets, passengers, money, identifiers
//! - **Outcomes**: tagged results for booking and cancellation
//! - **Errors**: the fault taxonomy (`thiserror`)
//! - **Collaborators**: traits for the ticket ledger, identity directory,
//!   notification sink and clock, injected as `Arc<dyn Trait>`
//!
//! ## Architecture
//!
//! ```text
//!   Directory ──► Caller ──► ReservationEngine ──► NotificationSink
//!                               │          │
//!                        RouteCatalog   TicketLedger
//! ```
//!
//! The engine lives in `seatline-reservation`; HTTP lives in `seatline-web`.

pub mod directory;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod notification;
pub mod outcome;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use directory::{Caller, Credentials, Directory, Role};
pub use environment::{Clock, SystemClock};
pub use error::{
    ConsistencyError, DirectoryError, NotifyError, ReservationError, StorageError,
    ValidationError,
};
pub use ledger::{MarkCancelled, TicketLedger};
pub use notification::{Notification, NotificationSink};
pub use outcome::{BookingResult, CancelResult, InventoryAudit};
pub use types::{
    BookingRequest, CallerId, Money, NewRoute, NewTicket, Passenger, Route, RouteId, Ticket,
    TicketId, TicketStatus,
};
