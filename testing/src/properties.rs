//! proptest strategies for booking workloads.

use proptest::prelude::*;

/// One step of a randomized workload against a single route.
#[derive(Debug, Clone)]
pub enum WorkloadStep {
    /// Book this many seats
    Book(u32),
    /// Cancel the n-th issued ticket, modulo the number issued
    Cancel(usize),
}

/// A route capacity between 1 and `max`
pub fn capacity(max: u32) -> impl Strategy<Value = u32> {
    1..=max
}

/// A single workload step; booking sizes go up to `max_seats`, zero included
pub fn workload_step(max_seats: u32) -> impl Strategy<Value = WorkloadStep> {
    prop_oneof![
        3 => (0..=max_seats).prop_map(WorkloadStep::Book),
        2 => any::<usize>().prop_map(WorkloadStep::Cancel),
    ]
}

/// A sequence of up to `len` workload steps
pub fn workload(max_seats: u32, len: usize) -> impl Strategy<Value = Vec<WorkloadStep>> {
    prop::collection::vec(workload_step(max_seats), 0..=len)
}
