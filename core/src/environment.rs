//! Injected dependencies shared by every component.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use seatline_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used in production.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
