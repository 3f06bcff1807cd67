//! Error types for web handlers.
//!
//! [`AppError`] carries a status code, a stable error code and a user-facing
//! message. Domain errors convert into it, so handlers can use `?` directly.
//! Business outcomes that are not successes (no seats left, ticket already
//! cancelled) become 409 responses that carry the outcome as JSON.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatline_core::{DirectoryError, ReservationError};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: String,
    /// Serialized business outcome, flattened into the body
    outcome: Option<serde_json::Value>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            outcome: None,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// HTTP status of the response
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            message.into(),
            "UNAUTHORIZED".to_string(),
        )
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            message.into(),
            "FORBIDDEN".to_string(),
        )
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} {id} not found"),
            "NOT_FOUND".to_string(),
        )
    }

    /// Create a 409 Conflict error carrying a business outcome.
    ///
    /// `outcome` must serialize to a JSON object; its fields are merged into
    /// the response body next to `code` and `message`.
    #[must_use]
    pub fn outcome_conflict(
        code: impl Into<String>,
        message: impl Into<String>,
        outcome: &impl Serialize,
    ) -> Self {
        let mut error = Self::new(StatusCode::CONFLICT, message.into(), code.into());
        error.outcome = serde_json::to_value(outcome)
            .ok()
            .filter(serde_json::Value::is_object);
        error
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE".to_string(),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: String,
    /// Human-readable error message.
    message: String,
    /// Business outcome fields, when there is one.
    #[serde(flatten)]
    outcome: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
            outcome: self.outcome,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::Validation(e) => Self::validation(e.to_string()),
            ReservationError::Forbidden { reason } => Self::forbidden(reason),
            ReservationError::RouteNotFound(id) => Self::not_found("Route", id),
            ReservationError::TicketNotFound(id) => Self::not_found("Ticket", id),
            ReservationError::Storage(e) => {
                Self::unavailable("Ticket storage is unavailable, please retry")
                    .with_source(anyhow::Error::new(e))
            }
            ReservationError::Consistency(e) => {
                Self::internal("Seat inventory is inconsistent").with_source(anyhow::Error::new(e))
            }
        }
    }
}

impl From<DirectoryError> for AppError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::MissingCredentials | DirectoryError::InvalidCredentials => {
                Self::unauthorized(err.to_string())
            }
            DirectoryError::Unavailable(_) => {
                Self::unavailable("Identity directory is unavailable")
                    .with_source(anyhow::Error::new(err))
            }
        }
    }
}
