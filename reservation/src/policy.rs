//! Who may do what.
//!
//! Administrators are unrestricted. Operators may always book; whether they
//! may cancel tickets submitted by someone else is a deployment choice.

use seatline_core::{Caller, ReservationError, Ticket};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which tickets an operator may cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Operators may cancel only tickets they booked
    #[default]
    OwnBookings,
    /// Operators may cancel any ticket
    AnyOperator,
}

impl CancelPolicy {
    /// Checks whether `caller` may cancel `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`ReservationError::Forbidden`] when the policy denies it.
    pub fn authorize_cancel(
        self,
        caller: &Caller,
        ticket: &Ticket,
    ) -> Result<(), ReservationError> {
        if caller.is_admin() || self == Self::AnyOperator || ticket.booked_by == caller.id {
            return Ok(());
        }
        Err(ReservationError::Forbidden {
            reason: format!(
                "operator {} may only cancel their own bookings (ticket {} was booked by {})",
                caller.id, ticket.id, ticket.booked_by
            ),
        })
    }
}

impl fmt::Display for CancelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnBookings => write!(f, "own_bookings"),
            Self::AnyOperator => write!(f, "any_operator"),
        }
    }
}

impl FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "own_bookings" | "own" => Ok(Self::OwnBookings),
            "any_operator" | "any" => Ok(Self::AnyOperator),
            other => Err(format!("unknown cancel policy '{other}'")),
        }
    }
}

/// Checks that `caller` is an administrator.
///
/// # Errors
///
/// Returns [`ReservationError::Forbidden`] for operators.
pub fn require_admin(caller: &Caller, operation: &str) -> Result<(), ReservationError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(ReservationError::Forbidden {
            reason: format!("{operation} requires an administrator"),
        })
    }
}
