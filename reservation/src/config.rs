//! Reservation engine configuration.
//!
//! Loads settings from environment variables with sensible defaults.

use crate::policy::CancelPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReservationConfig {
    /// Capacity for routes created without one
    pub default_total_seats: u32,
    /// Upper bound on seats in a single booking; `None` means route capacity
    /// is the only limit
    pub max_seats_per_booking: Option<u32>,
    /// Which tickets operators may cancel
    pub cancel_policy: CancelPolicy,
    /// How long a notification may take before it is abandoned, in milliseconds
    pub notify_timeout_ms: u64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            default_total_seats: 40,
            max_seats_per_booking: None,
            cancel_policy: CancelPolicy::OwnBookings,
            notify_timeout_ms: 2_000,
        }
    }
}

impl ReservationConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable variables fall back to [`ReservationConfig::default`].
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_total_seats: env::var("SEATLINE_DEFAULT_TOTAL_SEATS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|seats| *seats > 0)
                .unwrap_or(defaults.default_total_seats),
            max_seats_per_booking: env::var("SEATLINE_MAX_SEATS_PER_BOOKING")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|seats: &u32| *seats > 0)
                .or(defaults.max_seats_per_booking),
            cancel_policy: env::var("SEATLINE_CANCEL_POLICY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cancel_policy),
            notify_timeout_ms: env::var("SEATLINE_NOTIFY_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.notify_timeout_ms),
        }
    }

    /// Notification timeout as a `Duration`
    #[must_use]
    pub const fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }
}
