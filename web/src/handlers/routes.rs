//! Route catalog endpoints.
//!
//! Fares travel as integers in minor currency units (`5000` is 50.00).

use crate::error::AppError;
use crate::extractors::AuthenticatedCaller;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use seatline_core::{InventoryAudit, Money, NewRoute, Route, RouteId};
use serde::{Deserialize, Serialize};

/// `POST /api/routes` (administrators)
pub async fn create_route(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Json(request): Json<NewRoute>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let route = state.engine.create_route(&caller, request)?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// `GET /api/routes`
pub async fn list_routes(
    State(state): State<AppState>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
) -> Json<Vec<Route>> {
    Json(state.engine.list_routes())
}

/// `GET /api/routes/:id`
pub async fn get_route(
    State(state): State<AppState>,
    AuthenticatedCaller(_caller): AuthenticatedCaller,
    Path(route_id): Path<RouteId>,
) -> Result<Json<Route>, AppError> {
    Ok(Json(state.engine.get_route(route_id)?))
}

/// Body of `PUT /api/routes/:id/fare`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateFareRequest {
    /// New fare per seat, minor units
    pub fare_per_seat: Money,
}

/// `PUT /api/routes/:id/fare` (administrators)
pub async fn update_fare(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(route_id): Path<RouteId>,
    Json(request): Json<UpdateFareRequest>,
) -> Result<Json<Route>, AppError> {
    let route = state
        .engine
        .update_fare(&caller, route_id, request.fare_per_seat)?;
    Ok(Json(route))
}

/// `GET /api/routes/:id/audit` (administrators)
pub async fn audit_route(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    Path(route_id): Path<RouteId>,
) -> Result<Json<InventoryAudit>, AppError> {
    Ok(Json(state.engine.audit_route(&caller, route_id).await?))
}

/// `GET /api/audit` (administrators)
pub async fn audit_all(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Result<Json<Vec<InventoryAudit>>, AppError> {
    Ok(Json(state.engine.audit_all(&caller).await?))
}
