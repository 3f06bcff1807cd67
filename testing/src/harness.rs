//! A reservation engine wired to test doubles.

#![allow(clippy::expect_used)] // Harness setup failures are test bugs
#![allow(clippy::panic, clippy::missing_panics_doc)]

use crate::fixtures;
use crate::ledger_mocks::FlakyLedger;
use crate::mocks::test_clock;
use crate::notifiers::RecordingNotifier;
use seatline_core::error::Result;
use seatline_core::{
    BookingResult, Caller, CancelResult, InventoryAudit, NotificationSink, Route, RouteId, TicketId,
};
use seatline_reservation::{
    CancelPolicy, ReservationConfig, ReservationEngine, ReservationEnvironment,
};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`TestEngine`].
#[derive(Default)]
pub struct TestEngineBuilder {
    config: ReservationConfig,
    notifier: Option<Arc<dyn NotificationSink>>,
}

impl TestEngineBuilder {
    /// Replaces the whole configuration
    #[must_use]
    pub fn config(mut self, config: ReservationConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the cancel policy
    #[must_use]
    pub const fn cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.config.cancel_policy = policy;
        self
    }

    /// Caps the seats a single booking may request
    #[must_use]
    pub const fn max_seats_per_booking(mut self, max: u32) -> Self {
        self.config.max_seats_per_booking = Some(max);
        self
    }

    /// Sets the notification timeout
    #[must_use]
    pub fn notify_timeout(mut self, timeout: Duration) -> Self {
        self.config.notify_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Uses `notifier` instead of the harness recorder
    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Wires the engine
    #[must_use]
    pub fn build(self) -> TestEngine {
        let ledger = Arc::new(FlakyLedger::new());
        let recorder = Arc::new(RecordingNotifier::new());
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::clone(&recorder) as Arc<dyn NotificationSink>);

        let env = ReservationEnvironment::new(Arc::new(test_clock()), ledger.clone(), notifier);
        TestEngine {
            engine: Arc::new(ReservationEngine::new(env, self.config)),
            ledger,
            recorder,
        }
    }
}

/// Engine plus handles on its doubles.
pub struct TestEngine {
    /// The engine under test
    pub engine: Arc<ReservationEngine>,
    /// Ledger, for failure injection
    pub ledger: Arc<FlakyLedger>,
    /// Receives notifications unless the builder was given another sink
    pub recorder: Arc<RecordingNotifier>,
}

impl TestEngine {
    /// Starts a builder with default settings
    #[must_use]
    pub fn builder() -> TestEngineBuilder {
        TestEngineBuilder::default()
    }

    /// Creates a route as the fixture administrator
    #[must_use]
    pub fn route(&self, total_seats: u32, fare_minor: u64) -> Route {
        self.engine
            .create_route(&fixtures::admin(), fixtures::new_route(total_seats, fare_minor))
            .expect("fixture route should be valid")
    }

    /// Books `seats` on `route_id` for the fixture passenger
    ///
    /// # Errors
    ///
    /// Whatever [`ReservationEngine::book`] returns.
    pub async fn book(
        &self,
        caller: &Caller,
        route_id: RouteId,
        seats: u32,
    ) -> Result<BookingResult> {
        self.engine
            .book(caller, fixtures::booking(route_id, seats))
            .await
    }

    /// Books and returns the new ticket's ID, panicking on any other outcome
    pub async fn book_ticket(&self, caller: &Caller, route_id: RouteId, seats: u32) -> TicketId {
        match self.book(caller, route_id, seats).await {
            Ok(BookingResult::Success { ticket_id, .. }) => ticket_id,
            other => panic!("expected a successful booking, got {other:?}"),
        }
    }

    /// Cancels a ticket
    ///
    /// # Errors
    ///
    /// Whatever [`ReservationEngine::cancel`] returns.
    pub async fn cancel(&self, caller: &Caller, ticket_id: TicketId) -> Result<CancelResult> {
        self.engine.cancel(caller, ticket_id).await
    }

    /// Current availability of a route
    #[must_use]
    pub fn available(&self, route_id: RouteId) -> u32 {
        self.engine
            .get_route(route_id)
            .expect("route should exist")
            .available_seats
    }

    /// Audits a route
    pub async fn audit(&self, route_id: RouteId) -> InventoryAudit {
        self.engine
            .audit_route(&fixtures::admin(), route_id)
            .await
            .expect("audit should succeed")
    }
}
