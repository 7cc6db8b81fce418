use chrono::{DateTime, Utc};
use seatlock_shared::SeatState;
use std::fmt;
use tokio::task::AbortHandle;
use uuid::Uuid;

use crate::{ConflictReason, SeatError, SeatResult};

/// Capability handed out by `lock`. Compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle to a scheduled expiry task. The task is aborted on `cancel` or drop.
#[derive(Debug)]
pub(crate) struct ExpiryTimer(AbortHandle);

impl ExpiryTimer {
    pub(crate) fn new(handle: AbortHandle) -> Self {
        Self(handle)
    }

    pub(crate) fn cancel(&self) {
        self.0.abort();
    }
}

impl Drop for ExpiryTimer {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Lock metadata. Only exists inside `Seat::Locked`.
#[derive(Debug)]
pub(crate) struct Hold {
    pub token: LockToken,
    pub locked_at: DateTime<Utc>,
    pub expiry: ExpiryTimer,
}

#[derive(Debug)]
pub(crate) enum Seat {
    Available,
    Locked(Hold),
    Booked,
}

impl Seat {
    pub fn state(&self) -> SeatState {
        match self {
            Seat::Available => SeatState::Available,
            Seat::Locked(_) => SeatState::Locked,
            Seat::Booked => SeatState::Booked,
        }
    }

    pub fn is_held_by(&self, token: &LockToken) -> bool {
        matches!(self, Seat::Locked(hold) if hold.token == *token)
    }

    /// Precondition for `lock`.
    pub fn check_lockable(&self, seat_id: &str) -> SeatResult<()> {
        match self {
            Seat::Available => Ok(()),
            Seat::Locked(_) => Err(SeatError::conflict(seat_id, ConflictReason::AlreadyLocked)),
            Seat::Booked => Err(SeatError::conflict(seat_id, ConflictReason::AlreadyBooked)),
        }
    }

    /// Precondition for `confirm` and `unlock`: locked, and by this token.
    pub fn check_hold(&self, seat_id: &str, token: &str) -> SeatResult<()> {
        match self {
            Seat::Locked(hold) if hold.token.as_str() == token => Ok(()),
            Seat::Locked(_) => Err(SeatError::InvalidToken(seat_id.to_string())),
            _ => Err(SeatError::conflict(seat_id, ConflictReason::NotLocked)),
        }
    }

    /// Moves to `next`, cancelling any pending expiry first.
    pub fn transition(&mut self, next: Seat) {
        if let Seat::Locked(hold) = self {
            hold.expiry.cancel();
        }
        *self = next;
    }
}
