//! Application state for Axum handlers.

use crate::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use seatline_core::{Directory, SystemClock};
use seatline_reservation::{
    InMemoryTicketLedger, InboxNotificationSink, ReservationConfig, ReservationEngine,
    ReservationEnvironment, StaticDirectory,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The reservation core
    pub engine: Arc<ReservationEngine>,
    /// Resolves bearer tokens to callers
    pub directory: Arc<dyn Directory>,
    /// Per-caller notification inbox, served by `GET /api/notifications`
    pub inbox: Arc<InboxNotificationSink>,
    /// Prometheus renderer; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        engine: Arc<ReservationEngine>,
        directory: Arc<dyn Directory>,
        inbox: Arc<InboxNotificationSink>,
    ) -> Self {
        Self {
            engine,
            directory,
            inbox,
            metrics: None,
        }
    }

    /// Wires an in-process engine whose notifications land in the inbox.
    #[must_use]
    pub fn in_memory(config: ReservationConfig, directory: StaticDirectory) -> Self {
        let inbox = Arc::new(InboxNotificationSink::new());
        let env = ReservationEnvironment::new(
            Arc::new(SystemClock),
            Arc::new(InMemoryTicketLedger::new()),
            inbox.clone(),
        );
        Self::new(
            Arc::new(ReservationEngine::new(env, config)),
            Arc::new(directory),
            inbox,
        )
    }

    /// Builds state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns the directory parse error for malformed `SEATLINE_CALLERS`.
    pub fn from_config(config: &Config) -> Result<Self, seatline_reservation::DirectoryParseError> {
        let directory = config.directory()?;
        if directory.is_empty() {
            tracing::warn!("SEATLINE_CALLERS is empty: every API request will be rejected");
        }
        Ok(Self::in_memory(config.reservation.clone(), directory))
    }

    /// Serves Prometheus metrics from `handle` at `GET /metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
