//! Custom Axum extractors.
//!
//! - `AuthenticatedCaller`: resolve the bearer token through the directory
//! - `CorrelationId`: the request's correlation ID, set by the middleware
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     State(state): State<AppState>,
//!     AuthenticatedCaller(caller): AuthenticatedCaller,
//! ) -> Result<Json<Vec<Route>>, AppError> {
//!     tracing::info!(caller = %caller.id, "Listing routes");
//!     Ok(Json(state.engine.list_routes()))
//! }
//! ```

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use seatline_core::{Caller, Credentials};
use uuid::Uuid;

/// The caller behind the request's `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing or the token is unknown.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).unwrap_or_default();
        let caller = state
            .directory
            .resolve_caller(&Credentials::new(token))
            .await?;

        tracing::debug!(caller = %caller.id, role = %caller.role, "Caller resolved");
        Ok(Self(caller))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Correlation ID for request tracing.
///
/// Read from the request extensions when the middleware ran, otherwise from
/// the `X-Correlation-ID` header, otherwise freshly generated.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let correlation_id = parts
            .extensions
            .get::<Uuid>()
            .copied()
            .or_else(|| {
                parts
                    .headers
                    .get(CORRELATION_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| Uuid::parse_str(s).ok())
            })
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}
