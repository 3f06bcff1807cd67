//! Correlation ID middleware.
//!
//! Every request gets an ID: the client's `X-Correlation-ID` if it is a valid
//! UUID, a fresh v4 otherwise. The ID is stored in the request extensions,
//! recorded on a tracing span wrapping the handler, and echoed back in the
//! response header.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/routes", get(list_routes))
//!     .layer(axum::middleware::from_fn(correlation_id));
//! ```

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Attach a correlation ID to the request, its span and its response.
pub async fn correlation_id(mut req: Request, next: Next) -> Response {
    let correlation_id = req
        .headers()
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    req.extensions_mut().insert(correlation_id);

    let span = tracing::info_span!(
        "http_request",
        correlation_id = %correlation_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}
