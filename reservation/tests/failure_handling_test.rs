//! Ledger faults, notification faults and authorization.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use seatline_core::{
    BookingResult, CancelResult, ConsistencyError, ReservationError, StorageError, TicketStatus,
};
use seatline_reservation::CancelPolicy;
use seatline_testing::{FailingNotifier, SlowNotifier, TestEngine, fixtures};
use std::sync::Arc;
use std::time::Duration;

// ========== Ledger failures ==========

#[tokio::test]
async fn ledger_failure_rolls_back_reserved_seats() {
    let harness = TestEngine::builder().build();
    let route = harness.route(10, 5_000);
    harness.ledger.fail_next_creates(1);

    let result = harness.book(&fixtures::operator(), route.id, 4).await;
    assert!(
        matches!(
            result,
            Err(ReservationError::Storage(StorageError::Unavailable(_)))
        ),
        "got {result:?}"
    );
    assert_eq!(harness.available(route.id), 10);
    assert!(harness.ledger.is_empty());
    assert!(harness.recorder.is_empty());

    // The next attempt goes through normally
    let _ = harness.book_ticket(&fixtures::operator(), route.id, 4).await;
    assert_eq!(harness.available(route.id), 6);
    assert!(harness.audit(route.id).await.is_consistent());
}

#[tokio::test]
async fn ledger_failure_on_cancel_keeps_ticket_booked() {
    let harness = TestEngine::builder().build();
    let operator = fixtures::operator();
    let route = harness.route(10, 5_000);
    let ticket_id = harness.book_ticket(&operator, route.id, 2).await;

    harness.ledger.fail_cancels(true);
    assert!(matches!(
        harness.cancel(&operator, ticket_id).await,
        Err(ReservationError::Storage(_))
    ));
    assert_eq!(harness.available(route.id), 8);
    assert_eq!(
        harness.engine.get_ticket(ticket_id).await.unwrap().status,
        TicketStatus::Booked
    );

    harness.ledger.fail_cancels(false);
    assert!(matches!(
        harness.cancel(&operator, ticket_id).await.unwrap(),
        CancelResult::Success { .. }
    ));
    assert_eq!(harness.available(route.id), 10);
}

// ========== Notifications ==========

#[tokio::test]
async fn booking_and_cancellation_notify_the_booker() {
    let harness = TestEngine::builder().build();
    let operator = fixtures::operator();
    let route = harness.route(10, 5_000);

    let ticket_id = harness.book_ticket(&operator, route.id, 2).await;
    let _ = harness.cancel(&fixtures::admin(), ticket_id).await.unwrap();

    let messages = harness.recorder.messages_for(operator.id);
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("booked"));
    assert!(messages[0].contains(&ticket_id.to_string()));
    assert!(messages[1].contains("cancelled"));
    assert!(harness.recorder.messages_for(fixtures::admin().id).is_empty());
}

#[tokio::test]
async fn failing_notifier_does_not_fail_the_operation() {
    let notifier = Arc::new(FailingNotifier::new());
    let harness = TestEngine::builder().notifier(notifier.clone()).build();
    let operator = fixtures::operator();
    let route = harness.route(10, 5_000);

    let ticket_id = harness.book_ticket(&operator, route.id, 2).await;
    assert!(matches!(
        harness.cancel(&operator, ticket_id).await.unwrap(),
        CancelResult::Success { .. }
    ));
    assert_eq!(notifier.attempts(), 2);
    assert_eq!(harness.available(route.id), 10);
}

#[tokio::test(start_paused = true)]
async fn slow_notifier_is_abandoned_after_timeout() {
    let notifier = Arc::new(SlowNotifier::new(Duration::from_secs(60)));
    let harness = TestEngine::builder()
        .notify_timeout(Duration::from_millis(50))
        .notifier(notifier.clone())
        .build();
    let route = harness.route(10, 5_000);

    let result = harness.book(&fixtures::operator(), route.id, 1).await;
    assert!(matches!(result, Ok(BookingResult::Success { .. })));
    assert!(notifier.delivered().is_empty());
    assert_eq!(harness.available(route.id), 9);
}

// ========== Authorization ==========

#[tokio::test]
async fn operators_cannot_administer_routes() {
    let harness = TestEngine::builder().build();
    let route = harness.route(10, 5_000);

    assert!(matches!(
        harness
            .engine
            .create_route(&fixtures::operator(), fixtures::new_route(5, 100)),
        Err(ReservationError::Forbidden { .. })
    ));
    assert!(matches!(
        harness.engine.update_fare(
            &fixtures::operator(),
            route.id,
            seatline_core::Money::from_minor(1)
        ),
        Err(ReservationError::Forbidden { .. })
    ));
    assert!(matches!(
        harness
            .engine
            .audit_route(&fixtures::operator(), route.id)
            .await,
        Err(ReservationError::Forbidden { .. })
    ));
    assert!(matches!(
        harness.engine.audit_all(&fixtures::operator()).await,
        Err(ReservationError::Forbidden { .. })
    ));
    assert_eq!(harness.engine.list_routes().len(), 1);
}

#[tokio::test]
async fn failed_release_keeps_ticket_cancelled_and_reports_overflow() {
    let harness = TestEngine::builder().build();
    let operator = fixtures::operator();
    let route = harness.route(10, 5_000);
    let ticket_id = harness.book_ticket(&operator, route.id, 3).await;

    // Counter already back at capacity, so the cancel's release cannot fit.
    harness.engine.catalog().release_seats(route.id, 3).unwrap();

    assert!(matches!(
        harness.cancel(&operator, ticket_id).await,
        Err(ReservationError::Consistency(ConsistencyError::SeatOverflow {
            releasing: 3,
            ..
        }))
    ));
    let ticket = harness.engine.get_ticket(ticket_id).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Cancelled);
    assert_eq!(harness.available(route.id), 10);

    assert_eq!(
        harness.cancel(&operator, ticket_id).await.unwrap(),
        CancelResult::AlreadyCancelled
    );
    assert_eq!(harness.available(route.id), 10);
}

#[tokio::test]
async fn own_bookings_policy_blocks_other_operators() {
    let harness = TestEngine::builder()
        .cancel_policy(CancelPolicy::OwnBookings)
        .build();
    let route = harness.route(10, 5_000);
    let ticket_id = harness.book_ticket(&fixtures::operator(), route.id, 3).await;

    assert!(matches!(
        harness.cancel(&fixtures::other_operator(), ticket_id).await,
        Err(ReservationError::Forbidden { .. })
    ));
    assert_eq!(harness.available(route.id), 7);

    assert!(matches!(
        harness.cancel(&fixtures::admin(), ticket_id).await.unwrap(),
        CancelResult::Success { .. }
    ));
}

#[tokio::test]
async fn any_operator_policy_allows_other_operators() {
    let harness = TestEngine::builder()
        .cancel_policy(CancelPolicy::AnyOperator)
        .build();
    let route = harness.route(10, 5_000);
    let ticket_id = harness.book_ticket(&fixtures::operator(), route.id, 3).await;

    assert_eq!(
        harness
            .cancel(&fixtures::other_operator(), ticket_id)
            .await
            .unwrap(),
        CancelResult::Success {
            ticket_id,
            seats_released: 3,
        }
    );
}
