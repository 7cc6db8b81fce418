pub mod engine;
pub mod rules;
pub mod seat;

use std::fmt;

pub use engine::{ReservationEngine, SeatLock};
pub use rules::ReservationRules;
pub use seat::LockToken;

/// Why a seat refused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    AlreadyLocked,
    AlreadyBooked,
    NotLocked,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::AlreadyLocked => f.write_str("is already locked"),
            ConflictReason::AlreadyBooked => f.write_str("is already booked"),
            ConflictReason::NotLocked => f.write_str("is not locked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatError {
    #[error("Seat {0} does not exist.")]
    NotFound(String),

    #[error("Seat {seat_id} {reason}.")]
    Conflict {
        seat_id: String,
        reason: ConflictReason,
    },

    #[error("Invalid lock ID for seat {0}.")]
    InvalidToken(String),
}

impl SeatError {
    pub(crate) fn conflict(seat_id: &str, reason: ConflictReason) -> Self {
        SeatError::Conflict {
            seat_id: seat_id.to_string(),
            reason,
        }
    }
}

pub type SeatResult<T> = Result<T, SeatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(SeatError::NotFound("11".into()).to_string(), "Seat 11 does not exist.");
        assert_eq!(
            SeatError::conflict("2", ConflictReason::AlreadyBooked).to_string(),
            "Seat 2 is already booked."
        );
        assert_eq!(
            SeatError::conflict("2", ConflictReason::NotLocked).to_string(),
            "Seat 2 is not locked."
        );
        assert_eq!(SeatError::InvalidToken("2".into()).to_string(), "Invalid lock ID for seat 2.");
    }
}
