//! Callers, routes and passengers shared by tests.

use chrono::NaiveDate;
use seatline_core::{BookingRequest, Caller, CallerId, Money, NewRoute, Passenger, RouteId};

/// Caller ID used by [`admin`]
pub const ADMIN_ID: u64 = 1;
/// Caller ID used by [`operator`]
pub const OPERATOR_ID: u64 = 100;
/// Caller ID used by [`other_operator`]
pub const OTHER_OPERATOR_ID: u64 = 200;

/// An administrator
#[must_use]
pub const fn admin() -> Caller {
    Caller::admin(CallerId::new(ADMIN_ID))
}

/// An operator
#[must_use]
pub const fn operator() -> Caller {
    Caller::operator(CallerId::new(OPERATOR_ID))
}

/// A second operator, for ownership checks
#[must_use]
pub const fn other_operator() -> Caller {
    Caller::operator(CallerId::new(OTHER_OPERATOR_ID))
}

/// A route with the given capacity and fare in minor units
#[must_use]
pub fn new_route(total_seats: u32, fare_minor: u64) -> NewRoute {
    NewRoute {
        name: "Coastal Express".to_string(),
        source: "Mangalore".to_string(),
        destination: "Udupi".to_string(),
        distance: "60 km".to_string(),
        duration: "1h 30m".to_string(),
        fare_per_seat: Money::from_minor(fare_minor),
        total_seats: Some(total_seats),
    }
}

/// A valid passenger
#[must_use]
pub fn passenger() -> Passenger {
    Passenger {
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "+91 98450 00000".to_string(),
    }
}

/// Travel date used by [`booking`]
#[must_use]
pub fn travel_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default()
}

/// A booking request for `seats` seats on `route_id`
#[must_use]
pub fn booking(route_id: RouteId, seats: u32) -> BookingRequest {
    BookingRequest {
        route_id,
        passenger: passenger(),
        booking_date: travel_date(),
        seats,
    }
}
