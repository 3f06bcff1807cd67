//! The caller's notification inbox.

use crate::extractors::AuthenticatedCaller;
use crate::state::AppState;
use axum::{extract::State, Json};
use seatline_core::Notification;

/// `GET /api/notifications`: everything sent to the calling identity, oldest first
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> Json<Vec<Notification>> {
    Json(state.inbox.notifications_for(caller.id))
}
