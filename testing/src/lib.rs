//! # Seatline Testing
//!
//! Test doubles and helpers for the Seatline reservation core.
//!
//! This crate provides:
//! - Deterministic clock ([`FixedClock`])
//! - Notification sinks that record, fail, or stall
//! - A ticket ledger that fails on demand ([`FlakyLedger`])
//! - Caller, route and passenger fixtures
//! - [`TestEngine`], a fully wired engine for scenario tests
//! - proptest strategies for booking workloads
//!
//! ## Example
//!
//! ```
//! use seatline_core::BookingResult;
//! use seatline_testing::{TestEngine, fixtures};
//!
//! # tokio_test::block_on(async {
//! let harness = TestEngine::builder().build();
//! let route = harness.route(10, 5_000);
//!
//! let result = harness.book(&fixtures::operator(), route.id, 3).await;
//! assert!(matches!(result, Ok(BookingResult::Success { .. })));
//! assert!(harness.audit(route.id).await.is_consistent());
//! # });
//! ```

pub mod fixtures;
pub mod harness;
pub mod ledger_mocks;
pub mod notifiers;
pub mod properties;

use chrono::{DateTime, Utc};
use seatline_core::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use seatline_testing::mocks::FixedClock;
    /// use seatline_core::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which it does not.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Installs a `tracing` subscriber writing to the test output.
///
/// Honours `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use harness::{TestEngine, TestEngineBuilder};
pub use ledger_mocks::FlakyLedger;
pub use mocks::{FixedClock, test_clock};
pub use notifiers::{FailingNotifier, RecordingNotifier, SlowNotifier};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }
}
