//! Route catalog: the authoritative seat counters.
//!
//! **Concurrency Strategy**: one mutex per route. `try_reserve_seats` and
//! `release_seats` hold it only for a single check-and-mutate step, so
//! concurrent bookings on one route serialize there and nowhere else. The map
//! of routes sits behind an `RwLock` that is only written when a route is
//! created.

use seatline_core::{ConsistencyError, Money, NewRoute, Route, RouteId, ValidationError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Outcome of [`RouteCatalog::try_reserve_seats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatReservation {
    /// Seats were taken
    Reserved {
        /// Fare per seat observed inside the same critical section
        fare_per_seat: Money,
        /// Availability after the reservation
        available: u32,
    },
    /// Not enough seats; nothing changed
    InsufficientSeats {
        /// Availability when the request was evaluated
        available: u32,
    },
    /// No such route
    RouteNotFound,
}

/// Outcome of [`RouteCatalog::release_seats`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatRelease {
    /// Seats were returned
    Released {
        /// Availability after the release
        available: u32,
    },
    /// No such route
    RouteNotFound,
}

/// In-process owner of every route's seat inventory.
#[derive(Debug)]
pub struct RouteCatalog {
    routes: RwLock<BTreeMap<RouteId, Arc<Mutex<Route>>>>,
    next_id: AtomicU64,
    default_total_seats: u32,
}

impl RouteCatalog {
    /// Creates an empty catalog.
    ///
    /// `default_total_seats` is used for routes created without a capacity.
    #[must_use]
    pub fn new(default_total_seats: u32) -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            default_total_seats,
        }
    }

    /// Adds a route with every seat available.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a display field is blank or the
    /// capacity is zero.
    pub fn create_route(&self, new: NewRoute) -> Result<Route, ValidationError> {
        let total_seats = new.total_seats.unwrap_or(self.default_total_seats);
        Self::validate_new_route(&new, total_seats)?;

        let id = RouteId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let route = Route {
            id,
            name: new.name.trim().to_string(),
            source: new.source.trim().to_string(),
            destination: new.destination.trim().to_string(),
            distance: new.distance,
            duration: new.duration,
            fare_per_seat: new.fare_per_seat,
            total_seats,
            available_seats: total_seats,
        };

        self.write_routes()
            .insert(id, Arc::new(Mutex::new(route.clone())));

        tracing::debug!(route_id = %id, total_seats, "Route created");
        Ok(route)
    }

    fn validate_new_route(new: &NewRoute, total_seats: u32) -> Result<(), ValidationError> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if new.source.trim().is_empty() {
            return Err(ValidationError::EmptyField("source"));
        }
        if new.destination.trim().is_empty() {
            return Err(ValidationError::EmptyField("destination"));
        }
        if total_seats == 0 {
            return Err(ValidationError::ZeroCapacity);
        }
        Ok(())
    }

    /// Snapshot of one route.
    #[must_use]
    pub fn get_route(&self, id: RouteId) -> Option<Route> {
        self.slot(id).map(|slot| lock(&slot).clone())
    }

    /// Snapshot of every route, ascending by ID.
    #[must_use]
    pub fn list_routes(&self) -> Vec<Route> {
        let slots: Vec<Arc<Mutex<Route>>> = self.read_routes().values().cloned().collect();
        slots.iter().map(|slot| lock(slot).clone()).collect()
    }

    /// Atomically checks `available_seats >= count` and decrements.
    ///
    /// CRITICAL: this is the single serialization point for concurrent
    /// bookings on a route. On `InsufficientSeats` nothing is modified.
    #[must_use]
    pub fn try_reserve_seats(&self, id: RouteId, count: u32) -> SeatReservation {
        let Some(slot) = self.slot(id) else {
            return SeatReservation::RouteNotFound;
        };

        let mut route = lock(&slot);
        if route.available_seats < count {
            return SeatReservation::InsufficientSeats {
                available: route.available_seats,
            };
        }

        route.available_seats -= count;
        tracing::debug!(
            route_id = %id,
            reserved = count,
            available = route.available_seats,
            "Seats reserved"
        );

        SeatReservation::Reserved {
            fare_per_seat: route.fare_per_seat,
            available: route.available_seats,
        }
    }

    /// Atomically returns seats to a route.
    ///
    /// # Errors
    ///
    /// Returns [`ConsistencyError::SeatOverflow`] if availability would exceed
    /// capacity. The counter is left untouched in that case.
    pub fn release_seats(&self, id: RouteId, count: u32) -> Result<SeatRelease, ConsistencyError> {
        let Some(slot) = self.slot(id) else {
            return Ok(SeatRelease::RouteNotFound);
        };

        let mut route = lock(&slot);
        let released = route
            .available_seats
            .checked_add(count)
            .filter(|released| *released <= route.total_seats);

        let Some(available) = released else {
            let error = ConsistencyError::SeatOverflow {
                route_id: id,
                available: route.available_seats,
                releasing: count,
                total_seats: route.total_seats,
            };
            tracing::error!(route_id = %id, %error, "Seat release rejected");
            return Err(error);
        };

        route.available_seats = available;
        tracing::debug!(route_id = %id, released = count, available, "Seats released");
        Ok(SeatRelease::Released { available })
    }

    /// Changes a route's fare. Tickets already issued keep their fare.
    #[must_use]
    pub fn update_fare(&self, id: RouteId, fare_per_seat: Money) -> Option<Route> {
        let slot = self.slot(id)?;
        let mut route = lock(&slot);
        let previous = route.fare_per_seat;
        route.fare_per_seat = fare_per_seat;
        tracing::debug!(route_id = %id, %previous, fare = %fare_per_seat, "Fare updated");
        Some(route.clone())
    }

    /// Number of routes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_routes().len()
    }

    /// Whether the catalog holds no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_routes().is_empty()
    }

    fn slot(&self, id: RouteId) -> Option<Arc<Mutex<Route>>> {
        self.read_routes().get(&id).cloned()
    }

    fn read_routes(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<RouteId, Arc<Mutex<Route>>>> {
        self.routes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_routes(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, BTreeMap<RouteId, Arc<Mutex<Route>>>> {
        self.routes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Every critical section finishes its mutation before anything can panic,
// so a poisoned route still holds a valid counter.
fn lock(slot: &Mutex<Route>) -> MutexGuard<'_, Route> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_route(total_seats: Option<u32>) -> NewRoute {
        NewRoute {
            name: "Coastal Express".to_string(),
            source: "Mangalore".to_string(),
            destination: "Udupi".to_string(),
            distance: "60 km".to_string(),
            duration: "1h 30m".to_string(),
            fare_per_seat: Money::from_minor(5_000),
            total_seats,
        }
    }

    #[test]
    fn create_route_starts_fully_available() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(Some(10))).unwrap();

        assert_eq!(route.id, RouteId::new(1));
        assert_eq!(route.total_seats, 10);
        assert_eq!(route.available_seats, 10);
        assert_eq!(catalog.get_route(route.id), Some(route));
    }

    #[test]
    fn create_route_uses_default_capacity() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(None)).unwrap();
        assert_eq!(route.total_seats, 40);
    }

    #[test]
    fn create_route_rejects_blank_fields_and_zero_capacity() {
        let catalog = RouteCatalog::new(40);

        let mut blank = new_route(Some(10));
        blank.source = "  ".to_string();
        assert_eq!(
            catalog.create_route(blank),
            Err(ValidationError::EmptyField("source"))
        );
        assert_eq!(
            catalog.create_route(new_route(Some(0))),
            Err(ValidationError::ZeroCapacity)
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn route_ids_are_sequential() {
        let catalog = RouteCatalog::new(40);
        let first = catalog.create_route(new_route(None)).unwrap();
        let second = catalog.create_route(new_route(None)).unwrap();

        assert!(first.id < second.id);
        let listed: Vec<RouteId> = catalog.list_routes().iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![first.id, second.id]);
    }

    #[test]
    fn reserve_decrements_and_reports_fare() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(Some(10))).unwrap();

        assert_eq!(
            catalog.try_reserve_seats(route.id, 3),
            SeatReservation::Reserved {
                fare_per_seat: Money::from_minor(5_000),
                available: 7,
            }
        );
        assert_eq!(catalog.get_route(route.id).unwrap().available_seats, 7);
    }

    #[test]
    fn reserve_more_than_available_leaves_state_unchanged() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(Some(10))).unwrap();

        assert_eq!(
            catalog.try_reserve_seats(route.id, 11),
            SeatReservation::InsufficientSeats { available: 10 }
        );
        assert_eq!(catalog.get_route(route.id).unwrap().available_seats, 10);
    }

    #[test]
    fn reserve_and_release_on_unknown_route() {
        let catalog = RouteCatalog::new(40);
        assert_eq!(
            catalog.try_reserve_seats(RouteId::new(99), 1),
            SeatReservation::RouteNotFound
        );
        assert_eq!(
            catalog.release_seats(RouteId::new(99), 1),
            Ok(SeatRelease::RouteNotFound)
        );
    }

    #[test]
    fn release_past_capacity_is_a_consistency_error() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(Some(10))).unwrap();
        let _ = catalog.try_reserve_seats(route.id, 2);

        assert_eq!(
            catalog.release_seats(route.id, 3),
            Err(ConsistencyError::SeatOverflow {
                route_id: route.id,
                available: 8,
                releasing: 3,
                total_seats: 10,
            })
        );
        // Not clamped, not applied
        assert_eq!(catalog.get_route(route.id).unwrap().available_seats, 8);

        assert_eq!(
            catalog.release_seats(route.id, 2),
            Ok(SeatRelease::Released { available: 10 })
        );
    }

    #[test]
    fn update_fare_changes_only_the_fare() {
        let catalog = RouteCatalog::new(40);
        let route = catalog.create_route(new_route(Some(10))).unwrap();
        let _ = catalog.try_reserve_seats(route.id, 4);

        let updated = catalog
            .update_fare(route.id, Money::from_minor(7_500))
            .unwrap();
        assert_eq!(updated.fare_per_seat, Money::from_minor(7_500));
        assert_eq!(updated.available_seats, 6);
        assert!(catalog.update_fare(RouteId::new(42), Money::ZERO).is_none());
    }
}
