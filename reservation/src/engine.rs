//! Reservation engine: booking and cancellation across catalog and ledger.
//!
//! CRITICAL: booking touches two resources, the route's seat counter and the
//! ticket ledger, and must leave both or neither changed. No lock spans the
//! two. Seats are reserved first under the route mutex; if the ticket cannot
//! be stored afterwards the reservation is undone with a compensating release.
//!
//! ```text
//! Book:   reserve seats ──► store ticket ──► notify
//!                               │ fails
//!                               └──► release seats (compensation)
//!
//! Cancel: load ticket ──► authorize ──► CAS Booked→Cancelled ──► release seats ──► notify
//!                                         │ already cancelled
//!                                         └──► AlreadyCancelled (no release)
//! ```
//!
//! Notifications are sent after every lock is released and are bounded by a
//! timeout; their failure is logged and never reaches the caller.

use crate::catalog::{RouteCatalog, SeatRelease, SeatReservation};
use crate::config::ReservationConfig;
use crate::metrics;
use crate::policy::require_admin;
use seatline_core::error::Result;
use seatline_core::{
    BookingRequest, BookingResult, CallerId, CancelResult, Caller, Clock, ConsistencyError,
    InventoryAudit, MarkCancelled, Money, NewRoute, NewTicket, Notification, NotificationSink,
    NotifyError, Passenger, ReservationError, Route, RouteId, Ticket, TicketId, TicketLedger,
    ValidationError,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Environment dependencies for the reservation engine
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Ticket storage
    pub ledger: Arc<dyn TicketLedger>,
    /// Booking and cancellation notifications
    pub notifier: Arc<dyn NotificationSink>,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn TicketLedger>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            clock,
            ledger,
            notifier,
        }
    }
}

/// The reservation core.
///
/// Owns the route catalog; tickets and notifications go through the injected
/// environment. Safe to share across tasks behind an `Arc`.
pub struct ReservationEngine {
    catalog: RouteCatalog,
    env: ReservationEnvironment,
    config: ReservationConfig,
}

impl ReservationEngine {
    /// Creates an engine with an empty route catalog
    #[must_use]
    pub fn new(env: ReservationEnvironment, config: ReservationConfig) -> Self {
        Self {
            catalog: RouteCatalog::new(config.default_total_seats),
            env,
            config,
        }
    }

    /// Engine settings
    #[must_use]
    pub const fn config(&self) -> &ReservationConfig {
        &self.config
    }

    /// Direct access to the seat counters
    #[must_use]
    pub const fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    // ========== Routes ==========

    /// Creates a route. Administrators only.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Forbidden`] for operators and
    /// [`ReservationError::Validation`] for malformed routes.
    #[tracing::instrument(skip_all, fields(caller = %caller.id))]
    pub fn create_route(&self, caller: &Caller, new: NewRoute) -> Result<Route> {
        require_admin(caller, "create route")?;
        let route = self.catalog.create_route(new)?;
        metrics::update_seats_available(route.id, route.available_seats);
        info!(
            route_id = %route.id,
            name = %route.name,
            total_seats = route.total_seats,
            fare_per_seat = %route.fare_per_seat,
            "Route created"
        );
        Ok(route)
    }

    /// Changes a route's fare. Administrators only. Issued tickets keep the
    /// fare they were booked at.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Forbidden`] for operators and
    /// [`ReservationError::RouteNotFound`] for unknown routes.
    #[tracing::instrument(skip_all, fields(caller = %caller.id, route_id = %route_id))]
    pub fn update_fare(
        &self,
        caller: &Caller,
        route_id: RouteId,
        fare_per_seat: Money,
    ) -> Result<Route> {
        require_admin(caller, "update fare")?;
        let route = self
            .catalog
            .update_fare(route_id, fare_per_seat)
            .ok_or(ReservationError::RouteNotFound(route_id))?;
        info!(fare_per_seat = %fare_per_seat, "Fare updated");
        Ok(route)
    }

    /// Snapshot of every route, ascending by ID
    #[must_use]
    pub fn list_routes(&self) -> Vec<Route> {
        self.catalog.list_routes()
    }

    /// Snapshot of one route.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::RouteNotFound`] for unknown routes.
    pub fn get_route(&self, route_id: RouteId) -> Result<Route> {
        self.catalog
            .get_route(route_id)
            .ok_or(ReservationError::RouteNotFound(route_id))
    }

    // ========== Booking ==========

    /// Books seats on a route.
    ///
    /// `InsufficientSeats` and `RouteNotFound` are ordinary results. On
    /// `Err` no seats remain reserved, except for
    /// [`ConsistencyError::RollbackFailed`], which reports exactly that leak.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::Validation`] for malformed requests
    /// - [`ReservationError::Storage`] if the ticket could not be stored
    /// - [`ReservationError::Consistency`] if the compensating release failed
    #[tracing::instrument(
        skip_all,
        fields(caller = %caller.id, route_id = %request.route_id, seats = request.seats)
    )]
    pub async fn book(&self, caller: &Caller, request: BookingRequest) -> Result<BookingResult> {
        let seats = request.seats;
        let result = self.try_book(caller, request).await;
        match &result {
            Ok(outcome) => metrics::record_booking(outcome.label(), seats),
            Err(_) => metrics::record_booking("error", seats),
        }
        result
    }

    async fn try_book(&self, caller: &Caller, request: BookingRequest) -> Result<BookingResult> {
        let request = self.validate_booking(request)?;
        let BookingRequest {
            route_id,
            passenger,
            booking_date,
            seats,
        } = request;

        let fare_per_seat = match self.catalog.try_reserve_seats(route_id, seats) {
            SeatReservation::Reserved {
                fare_per_seat,
                available,
            } => {
                metrics::update_seats_available(route_id, available);
                fare_per_seat
            }
            SeatReservation::InsufficientSeats { available } => {
                info!(available, "Booking rejected: insufficient seats");
                return Ok(BookingResult::InsufficientSeats {
                    requested: seats,
                    available,
                });
            }
            SeatReservation::RouteNotFound => {
                info!("Booking rejected: route not found");
                return Ok(BookingResult::RouteNotFound);
            }
        };

        let Some(total_fare) = fare_per_seat.checked_multiply(seats) else {
            self.rollback(route_id, seats)?;
            return Err(ValidationError::FareOverflow { seats }.into());
        };

        let new_ticket = NewTicket {
            route_id,
            passenger,
            booking_date,
            seats_booked: seats,
            total_fare,
            booked_by: caller.id,
            booked_at: self.env.clock.now(),
        };

        let ticket_id = match self.env.ledger.create(new_ticket).await {
            Ok(ticket_id) => ticket_id,
            Err(storage_error) => {
                warn!(error = %storage_error, "Ticket could not be stored, releasing seats");
                self.rollback(route_id, seats)?;
                return Err(storage_error.into());
            }
        };

        info!(ticket_id = %ticket_id, total_fare = %total_fare, "Ticket booked");

        self.notify(
            caller.id,
            format!(
                "Ticket {ticket_id} booked: {seats} seat(s) on route {route_id} for {booking_date}, \
                 total fare {total_fare}"
            ),
        )
        .await;

        Ok(BookingResult::Success {
            ticket_id,
            total_fare,
        })
    }

    fn validate_booking(&self, mut request: BookingRequest) -> Result<BookingRequest> {
        if request.seats == 0 {
            return Err(ValidationError::ZeroSeats.into());
        }
        if let Some(max) = self.config.max_seats_per_booking {
            if request.seats > max {
                return Err(ValidationError::TooManySeats {
                    requested: request.seats,
                    max,
                }
                .into());
            }
        }

        let Passenger { name, email, phone } = &mut request.passenger;
        for (field, value) in [
            ("passenger_name", name),
            ("passenger_email", email),
            ("passenger_phone", phone),
        ] {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::EmptyField(field).into());
            }
            if trimmed.len() != value.len() {
                *value = trimmed.to_string();
            }
        }

        Ok(request)
    }

    /// Gives back seats taken by a booking that could not complete.
    fn rollback(&self, route_id: RouteId, seats: u32) -> Result<()> {
        let failure = match self.catalog.release_seats(route_id, seats) {
            Ok(SeatRelease::Released { available }) => {
                metrics::record_rollback();
                metrics::update_seats_available(route_id, available);
                warn!(route_id = %route_id, seats, available, "Seat reservation rolled back");
                return Ok(());
            }
            Ok(SeatRelease::RouteNotFound) => "route no longer in catalog".to_string(),
            Err(consistency) => consistency.to_string(),
        };

        let error = ConsistencyError::RollbackFailed {
            route_id,
            seats,
            reason: failure,
        };
        metrics::record_consistency_error();
        error!(%error, "Seats leaked: rollback failed");
        Err(error.into())
    }

    // ========== Cancellation ==========

    /// Cancels a ticket and returns its seats.
    ///
    /// Cancelling twice yields `Success` then `AlreadyCancelled`; seats are
    /// released exactly once.
    ///
    /// # Errors
    ///
    /// - [`ReservationError::Forbidden`] if the cancel policy denies the caller
    /// - [`ReservationError::Storage`] if the ledger fails
    /// - [`ReservationError::Consistency`] if the seats cannot be returned;
    ///   the ticket is cancelled regardless
    #[tracing::instrument(skip_all, fields(caller = %caller.id, ticket_id = %ticket_id))]
    pub async fn cancel(&self, caller: &Caller, ticket_id: TicketId) -> Result<CancelResult> {
        let result = self.try_cancel(caller, ticket_id).await;
        match &result {
            Ok(outcome) => metrics::record_cancellation(outcome.label()),
            Err(_) => metrics::record_cancellation("error"),
        }
        result
    }

    async fn try_cancel(&self, caller: &Caller, ticket_id: TicketId) -> Result<CancelResult> {
        let Some(ticket) = self.env.ledger.get(ticket_id).await? else {
            info!("Cancel rejected: ticket not found");
            return Ok(CancelResult::TicketNotFound);
        };

        self.config.cancel_policy.authorize_cancel(caller, &ticket)?;

        let cancelled = match self
            .env
            .ledger
            .mark_cancelled(ticket_id, self.env.clock.now())
            .await?
        {
            MarkCancelled::Cancelled(cancelled) => cancelled,
            MarkCancelled::AlreadyCancelled => {
                info!("Cancel ignored: ticket already cancelled");
                return Ok(CancelResult::AlreadyCancelled);
            }
            MarkCancelled::NotFound => return Ok(CancelResult::TicketNotFound),
        };

        self.release_cancelled(&cancelled)?;

        info!(
            route_id = %cancelled.route_id,
            seats_released = cancelled.seats_booked,
            "Ticket cancelled"
        );

        self.notify(
            cancelled.booked_by,
            format!(
                "Ticket {} cancelled: {} seat(s) on route {} released",
                cancelled.id, cancelled.seats_booked, cancelled.route_id
            ),
        )
        .await;

        Ok(CancelResult::Success {
            ticket_id,
            seats_released: cancelled.seats_booked,
        })
    }

    /// Returns a cancelled ticket's seats.
    ///
    /// On failure the ticket stays `Cancelled` and is never released again;
    /// the counter mismatch shows up in [`Self::audit_route`].
    fn release_cancelled(&self, ticket: &Ticket) -> Result<()> {
        let error = match self.catalog.release_seats(ticket.route_id, ticket.seats_booked) {
            Ok(SeatRelease::Released { available }) => {
                metrics::update_seats_available(ticket.route_id, available);
                return Ok(());
            }
            Ok(SeatRelease::RouteNotFound) => ConsistencyError::DanglingTicket {
                ticket_id: ticket.id,
                route_id: ticket.route_id,
            },
            Err(overflow) => overflow,
        };

        metrics::record_consistency_error();
        error!(%error, "Cancelled ticket's seats could not be released");
        Err(error.into())
    }

    // ========== Tickets ==========

    /// Snapshot of a route's tickets, ascending by ID, cancelled ones included.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::RouteNotFound`] for unknown routes and
    /// [`ReservationError::Storage`] if the ledger fails.
    pub async fn list_tickets_by_route(&self, route_id: RouteId) -> Result<Vec<Ticket>> {
        if self.catalog.get_route(route_id).is_none() {
            return Err(ReservationError::RouteNotFound(route_id));
        }
        Ok(self.env.ledger.list_by_route(route_id).await?)
    }

    /// Fetch one ticket.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::TicketNotFound`] for unknown tickets and
    /// [`ReservationError::Storage`] if the ledger fails.
    pub async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.env
            .ledger
            .get(ticket_id)
            .await?
            .ok_or(ReservationError::TicketNotFound(ticket_id))
    }

    // ========== Auditing ==========

    /// Compares a route's seat counter with the seats held by its booked
    /// tickets. Administrators only. Drift is reported, never corrected.
    ///
    /// The two reads are separate snapshots, so bookings in flight can show
    /// up as transient drift.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Forbidden`] for operators,
    /// [`ReservationError::RouteNotFound`] for unknown routes and
    /// [`ReservationError::Storage`] if the ledger fails.
    #[tracing::instrument(skip_all, fields(caller = %caller.id, route_id = %route_id))]
    pub async fn audit_route(
        &self,
        caller: &Caller,
        route_id: RouteId,
    ) -> Result<InventoryAudit> {
        require_admin(caller, "audit route")?;
        let route = self.get_route(route_id)?;
        let tickets = self.env.ledger.list_by_route(route_id).await?;
        Ok(Self::audit(&route, &tickets))
    }

    /// Audits every route against one pass over the whole ledger.
    /// Administrators only. Results are ascending by route ID.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Forbidden`] for operators and
    /// [`ReservationError::Storage`] if the ledger fails.
    #[tracing::instrument(skip_all, fields(caller = %caller.id))]
    pub async fn audit_all(&self, caller: &Caller) -> Result<Vec<InventoryAudit>> {
        require_admin(caller, "audit routes")?;
        let routes = self.catalog.list_routes();
        let tickets = self.env.ledger.list_all().await?;

        let mut by_route: BTreeMap<RouteId, Vec<Ticket>> = BTreeMap::new();
        for ticket in tickets {
            by_route.entry(ticket.route_id).or_default().push(ticket);
        }

        let orphaned = by_route
            .keys()
            .filter(|route_id| !routes.iter().any(|route| route.id == **route_id))
            .count();
        if orphaned > 0 {
            metrics::record_consistency_error();
            error!(orphaned, "Tickets reference routes missing from the catalog");
        }

        let audits: Vec<InventoryAudit> = routes
            .iter()
            .map(|route| {
                let tickets = by_route.get(&route.id).map_or(&[][..], Vec::as_slice);
                Self::audit(route, tickets)
            })
            .collect();
        info!(
            routes = audits.len(),
            drifting = audits.iter().filter(|audit| !audit.is_consistent()).count(),
            "Inventory audited"
        );
        Ok(audits)
    }

    fn audit(route: &Route, tickets: &[Ticket]) -> InventoryAudit {
        let (booked_tickets, booked_seats) = tickets
            .iter()
            .filter(|ticket| ticket.is_booked())
            .fold((0_usize, 0_u32), |(count, seats), ticket| {
                (count + 1, seats.saturating_add(ticket.seats_booked))
            });

        let audit = InventoryAudit {
            route_id: route.id,
            total_seats: route.total_seats,
            available_seats: route.available_seats,
            booked_seats,
            booked_tickets,
        };

        if !audit.is_consistent() {
            warn!(
                route_id = %route.id,
                available = audit.available_seats,
                expected = ?audit.expected_available(),
                "Inventory drift detected"
            );
        }
        audit
    }

    // ========== Notifications ==========

    async fn notify(&self, recipient: CallerId, message: String) {
        let notification = Notification {
            recipient,
            message,
            created_at: self.env.clock.now(),
        };
        let timeout = self.config.notify_timeout();

        match tokio::time::timeout(timeout, self.env.notifier.notify(notification)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                metrics::record_notification_failure("failed");
                warn!(recipient = %recipient, %error, "Notification failed");
            }
            Err(_) => {
                metrics::record_notification_failure("timeout");
                let error = NotifyError::TimedOut(timeout);
                warn!(recipient = %recipient, %error, "Notification abandoned");
            }
        }
    }
}

impl std::fmt::Debug for ReservationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationEngine")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
