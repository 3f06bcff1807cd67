//! In-memory ticket ledger.
//!
//! Tickets live in a `BTreeMap` keyed by their sequential ID, so listing is
//! naturally ascending. The status compare-and-set happens under the write
//! lock, which makes it atomic with respect to every other ledger call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use seatline_core::{
    MarkCancelled, NewTicket, RouteId, StorageError, Ticket, TicketId, TicketLedger, TicketStatus,
};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct LedgerState {
    tickets: BTreeMap<TicketId, Ticket>,
    last_id: u64,
}

/// Ticket ledger held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTicketLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryTicketLedger {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tickets ever issued
    #[must_use]
    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tickets
            .len()
    }

    /// Whether no ticket was ever issued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TicketLedger for InMemoryTicketLedger {
    async fn create(&self, ticket: NewTicket) -> Result<TicketId, StorageError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::Rejected("ticket id space exhausted".to_string()))?;

        let id = TicketId::new(next);
        state.last_id = next;
        state.tickets.insert(id, Ticket::booked(id, ticket));
        Ok(id)
    }

    async fn mark_cancelled(
        &self,
        id: TicketId,
        at: DateTime<Utc>,
    ) -> Result<MarkCancelled, StorageError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(ticket) = state.tickets.get_mut(&id) else {
            return Ok(MarkCancelled::NotFound);
        };

        match ticket.status {
            TicketStatus::Cancelled => Ok(MarkCancelled::AlreadyCancelled),
            TicketStatus::Booked => {
                ticket.status = TicketStatus::Cancelled;
                ticket.cancelled_at = Some(at);
                Ok(MarkCancelled::Cancelled(ticket.clone()))
            }
        }
    }

    async fn get(&self, id: TicketId) -> Result<Option<Ticket>, StorageError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.tickets.get(&id).cloned())
    }

    async fn list_by_route(&self, route_id: RouteId) -> Result<Vec<Ticket>, StorageError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .tickets
            .values()
            .filter(|ticket| ticket.route_id == route_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Ticket>, StorageError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.tickets.values().cloned().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use seatline_core::{CallerId, Money, Passenger};

    fn new_ticket(route: u64, seats: u32) -> NewTicket {
        NewTicket {
            route_id: RouteId::new(route),
            passenger: Passenger {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                phone: "555-0100".to_string(),
            },
            booking_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            seats_booked: seats,
            total_fare: Money::from_minor(5_000 * u64::from(seats)),
            booked_by: CallerId::new(7),
            booked_at: DateTime::<Utc>::default(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ascending_ids_with_booked_status() {
        let ledger = InMemoryTicketLedger::new();
        let first = ledger.create(new_ticket(1, 2)).await.unwrap();
        let second = ledger.create(new_ticket(1, 1)).await.unwrap();

        assert!(first < second);
        let ticket = ledger.get(first).await.unwrap().unwrap();
        assert_eq!(ticket.status, TicketStatus::Booked);
        assert_eq!(ticket.total_fare, Money::from_minor(10_000));
        assert_eq!(ticket.cancelled_at, None);
    }

    #[tokio::test]
    async fn mark_cancelled_is_compare_and_set() {
        let ledger = InMemoryTicketLedger::new();
        let id = ledger.create(new_ticket(1, 2)).await.unwrap();
        let at = Utc::now();

        let MarkCancelled::Cancelled(ticket) = ledger.mark_cancelled(id, at).await.unwrap() else {
            panic!("first cancel should win");
        };
        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert_eq!(ticket.cancelled_at, Some(at));

        assert_eq!(
            ledger.mark_cancelled(id, Utc::now()).await.unwrap(),
            MarkCancelled::AlreadyCancelled
        );
        // First cancellation time is preserved
        assert_eq!(ledger.get(id).await.unwrap().unwrap().cancelled_at, Some(at));
    }

    #[tokio::test]
    async fn mark_cancelled_unknown_ticket() {
        let ledger = InMemoryTicketLedger::new();
        assert_eq!(
            ledger.mark_cancelled(TicketId::new(5), Utc::now()).await.unwrap(),
            MarkCancelled::NotFound
        );
    }

    #[tokio::test]
    async fn list_by_route_filters_and_keeps_history() {
        let ledger = InMemoryTicketLedger::new();
        let a = ledger.create(new_ticket(1, 1)).await.unwrap();
        let _other = ledger.create(new_ticket(2, 1)).await.unwrap();
        let c = ledger.create(new_ticket(1, 3)).await.unwrap();
        let _ = ledger.mark_cancelled(a, Utc::now()).await.unwrap();

        let ids: Vec<TicketId> = ledger
            .list_by_route(RouteId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(ledger.list_all().await.unwrap().len(), 3);
    }
}
