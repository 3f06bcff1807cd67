//! Booking, cancellation and ticket lookup endpoints.

use crate::error::AppError;
use crate::extractors::AuthenticatedCaller;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use seatline_core::{
    BookingRequest, BookingResult, CancelResult, Passenger, RouteId, Ticket, TicketId,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/routes/:id/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTicketRequest {
    /// Passenger's full name
    pub passenger_name: String,
    /// Passenger's email
    pub passenger_email: String,
    /// Passenger's phone number
    pub passenger_phone: String,
    /// Travel date (`YYYY-MM-DD`)
    pub booking_date: NaiveDate,
    /// Seats requested
    pub seats: u32,
}

/// `POST /api/routes/:id/tickets`
///
/// 201 with the `success` outcome, 409 with `insufficient_seats`.
pub async fn book_ticket(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(route_id): Path<RouteId>,
    Json(request): Json<BookTicketRequest>,
) -> Result<(StatusCode, Json<BookingResult>), AppError> {
    let booking = BookingRequest {
        route_id,
        passenger: Passenger {
            name: request.passenger_name,
            email: request.passenger_email,
            phone: request.passenger_phone,
        },
        booking_date: request.booking_date,
        seats: request.seats,
    };

    match state.engine.book(&caller, booking).await? {
        result @ BookingResult::Success { .. } => Ok((StatusCode::CREATED, Json(result))),
        result @ BookingResult::InsufficientSeats {
            requested,
            available,
        } => Err(AppError::outcome_conflict(
            "INSUFFICIENT_SEATS",
            format!("Requested {requested} seats but only {available} are available"),
            &result,
        )),
        BookingResult::RouteNotFound => Err(AppError::not_found("Route", route_id)),
    }
}

/// `POST /api/tickets/:id/cancel`
///
/// 200 with the `success` outcome, 409 with `already_cancelled`.
pub async fn cancel_ticket(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<CancelResult>, AppError> {
    match state.engine.cancel(&caller, ticket_id).await? {
        result @ CancelResult::Success { .. } => Ok(Json(result)),
        result @ CancelResult::AlreadyCancelled => Err(AppError::outcome_conflict(
            "ALREADY_CANCELLED",
            format!("Ticket {ticket_id} is already cancelled"),
            &result,
        )),
        CancelResult::TicketNotFound => Err(AppError::not_found("Ticket", ticket_id)),
    }
}

/// `GET /api/routes/:id/tickets`
pub async fn list_tickets(
    State(state): State<AppState>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    Path(route_id): Path<RouteId>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.engine.list_tickets_by_route(route_id).await?))
}

/// `GET /api/tickets/:id`
pub async fn get_ticket(
    State(state): State<AppState>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    Path(ticket_id): Path<TicketId>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.engine.get_ticket(ticket_id).await?))
}
