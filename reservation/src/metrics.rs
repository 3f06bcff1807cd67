//! Business metrics for the reservation core.
//!
//! Recorded through the `metrics` facade; the server installs a Prometheus
//! recorder. Without a recorder every call is a no-op, which is what tests get.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `seatline_bookings_total{outcome}` - Booking attempts by outcome
//! - `seatline_cancellations_total{outcome}` - Cancellation attempts by outcome
//! - `seatline_seats_booked_total` - Seats sold
//! - `seatline_booking_rollbacks_total` - Seat reservations undone after a ledger failure
//! - `seatline_notification_failures_total{kind}` - Notifications that failed or timed out
//! - `seatline_consistency_errors_total` - Inventory invariant violations
//!
//! ## Gauges
//! - `seatline_seats_available{route_id}` - Current availability per route

use metrics::{describe_counter, describe_gauge};
use seatline_core::RouteId;

/// Register all metric descriptions.
///
/// Call once at startup, after installing the recorder.
pub fn register_business_metrics() {
    describe_counter!(
        "seatline_bookings_total",
        "Booking attempts by outcome (success, insufficient_seats, route_not_found, error)"
    );
    describe_counter!(
        "seatline_cancellations_total",
        "Cancellation attempts by outcome (success, already_cancelled, ticket_not_found, error)"
    );
    describe_counter!("seatline_seats_booked_total", "Total seats sold");
    describe_counter!(
        "seatline_booking_rollbacks_total",
        "Seat reservations released because the ticket could not be stored"
    );
    describe_counter!(
        "seatline_notification_failures_total",
        "Notifications that failed (kind=failed) or timed out (kind=timeout)"
    );
    describe_counter!(
        "seatline_consistency_errors_total",
        "Inventory invariant violations detected"
    );
    describe_gauge!(
        "seatline_seats_available",
        "Current number of available seats per route"
    );

    tracing::info!("Business metrics registered");
}

/// Record the outcome of a booking attempt.
pub fn record_booking(outcome: &'static str, seats: u32) {
    metrics::counter!("seatline_bookings_total", "outcome" => outcome).increment(1);
    if outcome == "success" {
        metrics::counter!("seatline_seats_booked_total").increment(u64::from(seats));
    }
}

/// Record the outcome of a cancellation attempt.
pub fn record_cancellation(outcome: &'static str) {
    metrics::counter!("seatline_cancellations_total", "outcome" => outcome).increment(1);
}

/// Record a compensating seat release.
pub fn record_rollback() {
    metrics::counter!("seatline_booking_rollbacks_total").increment(1);
}

/// Record a notification that did not go through.
pub fn record_notification_failure(kind: &'static str) {
    metrics::counter!("seatline_notification_failures_total", "kind" => kind).increment(1);
}

/// Record an invariant violation.
pub fn record_consistency_error() {
    metrics::counter!("seatline_consistency_errors_total").increment(1);
}

/// Update the availability gauge for a route.
pub fn update_seats_available(route_id: RouteId, available: u32) {
    metrics::gauge!("seatline_seats_available", "route_id" => route_id.value().to_string())
        .set(f64::from(available));
}
