//! # Seatline Reservation
//!
//! The seat-reservation core: route catalog, ticket ledger and the engine
//! that keeps the two consistent under concurrent bookings and cancellations.
//!
//! ## Invariant
//!
//! For every route, at every quiescent point:
//!
//! ```text
//! available_seats + Σ seats_booked (tickets in Booked status) == total_seats
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use seatline_core::{Caller, CallerId, Money, NewRoute, SystemClock};
//! use seatline_reservation::{
//!     InMemoryTicketLedger, LogNotificationSink, ReservationConfig, ReservationEngine,
//!     ReservationEnvironment,
//! };
//! use std::sync::Arc;
//!
//! let env = ReservationEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(InMemoryTicketLedger::new()),
//!     Arc::new(LogNotificationSink),
//! );
//! let engine = ReservationEngine::new(env, ReservationConfig::default());
//!
//! let admin = Caller::admin(CallerId::new(1));
//! let route = engine
//!     .create_route(
//!         &admin,
//!         NewRoute {
//!             name: "Coastal Express".to_string(),
//!             source: "Mangalore".to_string(),
//!             destination: "Udupi".to_string(),
//!             distance: "60 km".to_string(),
//!             duration: "1h 30m".to_string(),
//!             fare_per_seat: Money::from_minor(5_000),
//!             total_seats: Some(10),
//!         },
//!     )
//!     .map_err(|e| e.to_string())?;
//! assert_eq!(route.available_seats, 10);
//! # Ok::<(), String>(())
//! ```

pub mod catalog;
pub mod config;
pub mod directory;
pub mod engine;
pub mod ledger;
pub mod metrics;
pub mod notify;
pub mod policy;

pub use catalog::{RouteCatalog, SeatRelease, SeatReservation};
pub use config::ReservationConfig;
pub use directory::{DirectoryParseError, StaticDirectory};
pub use engine::{ReservationEngine, ReservationEnvironment};
pub use ledger::InMemoryTicketLedger;
pub use notify::{InboxNotificationSink, LogNotificationSink};
pub use policy::{CancelPolicy, require_admin};
