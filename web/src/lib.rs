//! # Seatline Web
//!
//! Axum HTTP surface for the Seatline reservation core.
//!
//! # Request Flow
//!
//! 1. **Correlation ID** middleware tags the request and its span
//! 2. **`AuthenticatedCaller`** resolves the bearer token through the directory
//! 3. **Handler** calls the `ReservationEngine` with the explicit caller
//! 4. **Outcome** maps to a status code; errors convert via [`AppError`]
//!
//! | Outcome / error                          | Status |
//! |------------------------------------------|--------|
//! | booking success                          | 201    |
//! | other success                            | 200    |
//! | `insufficient_seats`, `already_cancelled`| 409    |
//! | route or ticket not found                | 404    |
//! | validation                               | 422    |
//! | missing or unknown token                 | 401    |
//! | forbidden                                | 403    |
//! | storage fault                            | 503    |
//! | consistency error                        | 500    |

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{get, post, put},
    Router,
};
use handlers::{notifications, routes, tickets};
use tower_http::trace::TraceLayer;

// Re-export key types for convenience
pub use config::{Config, ServerConfig};
pub use error::AppError;
pub use extractors::{AuthenticatedCaller, CorrelationId};
pub use middleware::{correlation_id, CORRELATION_ID_HEADER};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

/// Build the complete Axum router.
///
/// Health endpoints are open; everything under `/api` requires a bearer token.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/routes",
            post(routes::create_route).get(routes::list_routes),
        )
        .route("/routes/:id", get(routes::get_route))
        .route("/routes/:id/fare", put(routes::update_fare))
        .route(
            "/routes/:id/tickets",
            post(tickets::book_ticket).get(tickets::list_tickets),
        )
        .route("/routes/:id/audit", get(routes::audit_route))
        .route("/audit", get(routes::audit_all))
        .route("/tickets/:id", get(tickets::get_ticket))
        .route("/tickets/:id/cancel", post(tickets::cancel_ticket))
        .route("/notifications", get(notifications::list_notifications));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(correlation_id))
        .with_state(state)
}
