//! HTTP API tests: drive the router in-process with `oneshot`.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use seatline_core::Directory;
use seatline_reservation::{
    CancelPolicy, InboxNotificationSink, ReservationConfig, StaticDirectory,
};
use seatline_testing::{TestEngine, fixtures};
use seatline_web::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "admin-token";
const OPERATOR_TOKEN: &str = "operator-token";
const OTHER_TOKEN: &str = "other-token";

fn directory() -> StaticDirectory {
    StaticDirectory::new()
        .with_caller(ADMIN_TOKEN, fixtures::admin())
        .with_caller(OPERATOR_TOKEN, fixtures::operator())
        .with_caller(OTHER_TOKEN, fixtures::other_operator())
}

fn app() -> Router {
    build_router(AppState::in_memory(ReservationConfig::default(), directory()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn create_route(app: &Router, total_seats: u32, fare: u64) -> u64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/routes",
        Some(ADMIN_TOKEN),
        Some(json!({
            "name": "Coastal Express",
            "source": "Mangalore",
            "destination": "Udupi",
            "distance": "60 km",
            "duration": "1h 30m",
            "fare_per_seat": fare,
            "total_seats": total_seats,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_u64().unwrap()
}

fn booking(seats: u32) -> Value {
    json!({
        "passenger_name": "Asha Rao",
        "passenger_email": "asha@example.com",
        "passenger_phone": "+91 98450 00000",
        "booking_date": "2025-03-14",
        "seats": seats,
    })
}

#[tokio::test]
async fn health_endpoints_need_no_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);

    // No recorder installed in tests
    let (status, _) = send(&app, Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_requires_a_known_bearer_token() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/routes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/routes", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn book_cancel_cancel_again_over_http() {
    let app = app();
    let route_id = create_route(&app, 10, 5_000).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(3)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["total_fare"], 15_000);
    let ticket_id = body["ticket_id"].as_u64().unwrap();

    let (_, route) = send(
        &app,
        Method::GET,
        &format!("/api/routes/{route_id}"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(route["available_seats"], 7);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/tickets/{ticket_id}/cancel"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "success");
    assert_eq!(body["seats_released"], 3);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/tickets/{ticket_id}/cancel"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["outcome"], "already_cancelled");
    assert_eq!(body["code"], "ALREADY_CANCELLED");

    let (_, ticket) = send(
        &app,
        Method::GET,
        &format!("/api/tickets/{ticket_id}"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(ticket["status"], "cancelled");
}

#[tokio::test]
async fn insufficient_seats_is_a_conflict_with_outcome() {
    let app = app();
    let route_id = create_route(&app, 10, 5_000).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(11)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["outcome"], "insufficient_seats");
    assert_eq!(body["requested"], 11);
    assert_eq!(body["available"], 10);

    let (_, tickets) = send(
        &app,
        Method::GET,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(tickets, json!([]));
}

#[tokio::test]
async fn not_found_and_validation_statuses() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/routes/77/tickets",
        Some(OPERATOR_TOKEN),
        Some(booking(1)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tickets/77/cancel",
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/api/tickets/77", Some(OPERATOR_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let route_id = create_route(&app, 10, 5_000).await;
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn admin_only_endpoints_reject_operators() {
    let app = app();
    let route_id = create_route(&app, 10, 5_000).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/routes",
        Some(OPERATOR_TOKEN),
        Some(json!({
            "name": "x", "source": "a", "destination": "b",
            "distance": "1 km", "duration": "5m", "fare_per_seat": 100
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/routes/{route_id}/fare"),
        Some(OPERATOR_TOKEN),
        Some(json!({ "fare_per_seat": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/routes/{route_id}/audit"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, audit) = send(
        &app,
        Method::GET,
        &format!("/api/routes/{route_id}/audit"),
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audit["available_seats"], 10);
    assert_eq!(audit["booked_seats"], 0);

    let (status, _) = send(&app, Method::GET, "/api/audit", Some(OPERATOR_TOKEN), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, audits) = send(&app, Method::GET, "/api/audit", Some(ADMIN_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(audits.as_array().map(Vec::len), Some(1));
    assert_eq!(audits[0]["route_id"], route_id);
}

#[tokio::test]
async fn fare_update_does_not_touch_issued_tickets() {
    let app = app();
    let route_id = create_route(&app, 10, 10_000).await;

    let (_, booked) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(2)),
    )
    .await;
    let ticket_id = booked["ticket_id"].as_u64().unwrap();

    let (status, route) = send(
        &app,
        Method::PUT,
        &format!("/api/routes/{route_id}/fare"),
        Some(ADMIN_TOKEN),
        Some(json!({ "fare_per_seat": 15_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(route["fare_per_seat"], 15_000);

    let (_, ticket) = send(
        &app,
        Method::GET,
        &format!("/api/tickets/{ticket_id}"),
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(ticket["total_fare"], 20_000);
}

#[tokio::test]
async fn operators_cannot_cancel_each_others_tickets_by_default() {
    let app = app();
    let route_id = create_route(&app, 10, 5_000).await;
    let (_, booked) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(1)),
    )
    .await;
    let ticket_id = booked["ticket_id"].as_u64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/tickets/{ticket_id}/cancel"),
        Some(OTHER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn notifications_are_scoped_to_the_caller() {
    let app = app();
    let route_id = create_route(&app, 10, 5_000).await;
    let _ = send(
        &app,
        Method::POST,
        &format!("/api/routes/{route_id}/tickets"),
        Some(OPERATOR_TOKEN),
        Some(booking(2)),
    )
    .await;

    let (status, mine) = send(
        &app,
        Method::GET,
        "/api/notifications",
        Some(OPERATOR_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert!(mine[0]["message"].as_str().unwrap().contains("booked"));

    let (_, theirs) = send(&app, Method::GET, "/api/notifications", Some(OTHER_TOKEN), None).await;
    assert_eq!(theirs, json!([]));
}

#[tokio::test]
async fn storage_fault_is_service_unavailable() {
    let harness = TestEngine::builder()
        .cancel_policy(CancelPolicy::OwnBookings)
        .build();
    let route = harness.route(10, 5_000);
    harness.ledger.fail_next_creates(1);

    let directory: Arc<dyn Directory> = Arc::new(directory());
    let state = AppState::new(
        Arc::clone(&harness.engine),
        directory,
        Arc::new(InboxNotificationSink::new()),
    );
    let app = build_router(state);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/routes/{}/tickets", route.id.value()),
        Some(OPERATOR_TOKEN),
        Some(booking(4)),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(harness.available(route.id), 10);
}

#[tokio::test]
async fn responses_carry_a_correlation_id() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key(seatline_web::CORRELATION_ID_HEADER));
}
