//! Property test: seat accounting survives any sequence of bookings and
//! cancellations.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use proptest::prelude::*;
use seatline_core::{BookingResult, CancelResult, TicketId};
use seatline_reservation::CancelPolicy;
use seatline_testing::properties::{WorkloadStep, capacity, workload};
use seatline_testing::{TestEngine, fixtures};

const MAX_SEATS: u32 = 12;

fn run_workload(total_seats: u32, steps: &[WorkloadStep]) -> Result<(), TestCaseError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let harness = TestEngine::builder()
            .max_seats_per_booking(MAX_SEATS)
            .cancel_policy(CancelPolicy::AnyOperator)
            .build();
        let route = harness.route(total_seats, 1_000);
        let operator = fixtures::operator();

        let mut issued: Vec<TicketId> = Vec::new();
        let mut expected_available = total_seats;

        for step in steps {
            match *step {
                WorkloadStep::Book(seats) => match harness.book(&operator, route.id, seats).await {
                    Ok(BookingResult::Success { ticket_id, .. }) => {
                        prop_assert!(seats <= expected_available);
                        expected_available -= seats;
                        issued.push(ticket_id);
                    }
                    Ok(BookingResult::InsufficientSeats { available, .. }) => {
                        prop_assert!(seats > expected_available);
                        prop_assert_eq!(available, expected_available);
                    }
                    Ok(BookingResult::RouteNotFound) => prop_assert!(false, "route vanished"),
                    Err(_) => prop_assert_eq!(seats, 0),
                },
                WorkloadStep::Cancel(pick) => {
                    if issued.is_empty() {
                        continue;
                    }
                    let ticket_id = issued[pick % issued.len()];
                    let seats = harness.engine.get_ticket(ticket_id).await.unwrap().seats_booked;
                    match harness.cancel(&operator, ticket_id).await.unwrap() {
                        CancelResult::Success { seats_released, .. } => {
                            prop_assert_eq!(seats_released, seats);
                            expected_available += seats;
                        }
                        CancelResult::AlreadyCancelled => {}
                        CancelResult::TicketNotFound => prop_assert!(false, "ticket vanished"),
                    }
                }
            }

            prop_assert_eq!(harness.available(route.id), expected_available);
            prop_assert!(harness.audit(route.id).await.is_consistent());
        }
        Ok(())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn available_plus_booked_equals_total(
        total_seats in capacity(30),
        steps in workload(MAX_SEATS, 40),
    ) {
        run_workload(total_seats, &steps)?;
    }
}
