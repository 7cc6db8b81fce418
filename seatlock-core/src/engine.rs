use chrono::{DateTime, Utc};
use seatlock_shared::{SeatEvent, SeatStatus};
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use crate::rules::ReservationRules;
use crate::seat::{ExpiryTimer, Hold, LockToken, Seat};
use crate::{SeatError, SeatResult};

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Returned by a successful `lock`. The token is the caller's only way to
/// confirm or release the seat.
#[derive(Debug, Clone)]
pub struct SeatLock {
    pub seat_id: String,
    pub lock_token: LockToken,
    pub locked_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Owns a fixed seat pool and the expiry timers of its locks.
///
/// Every operation, including the expiry handler, runs its whole
/// check-then-mutate sequence under one pool-wide mutex. Cloning is cheap and
/// yields another handle to the same pool.
#[derive(Clone)]
pub struct ReservationEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    seats: Mutex<BTreeMap<String, Seat>>,
    seat_count: usize,
    lock_duration: Duration,
    events: broadcast::Sender<SeatEvent>,
}

impl ReservationEngine {
    pub fn new<I, S>(seat_ids: I, lock_duration: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seats: BTreeMap<String, Seat> = seat_ids
            .into_iter()
            .map(|id| (id.into(), Seat::Available))
            .collect();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(EngineInner {
                seat_count: seats.len(),
                seats: Mutex::new(seats),
                lock_duration,
                events,
            }),
        }
    }

    pub fn from_rules(rules: &ReservationRules) -> Self {
        Self::new(rules.seat_ids(), rules.lock_duration())
    }

    pub fn lock_duration(&self) -> Duration {
        self.inner.lock_duration
    }

    pub fn seat_count(&self) -> usize {
        self.inner.seat_count
    }

    /// Lifecycle events for every successful transition.
    pub fn subscribe(&self) -> broadcast::Receiver<SeatEvent> {
        self.inner.events.subscribe()
    }

    /// Snapshot of every seat's state.
    pub async fn list_seats(&self) -> BTreeMap<String, SeatStatus> {
        let seats = self.inner.seats.lock().await;
        seats
            .iter()
            .map(|(id, seat)| (id.clone(), SeatStatus::from(seat.state())))
            .collect()
    }

    /// Locks an available seat and schedules its release after `lock_duration`.
    pub async fn lock(&self, seat_id: &str) -> SeatResult<SeatLock> {
        let mut seats = self.inner.seats.lock().await;
        let seat = seats
            .get_mut(seat_id)
            .ok_or_else(|| SeatError::NotFound(seat_id.to_string()))?;

        if let Err(e) = seat.check_lockable(seat_id) {
            debug!(seat_id, "Lock rejected: {}", e);
            return Err(e);
        }

        let token = LockToken::generate();
        let locked_at = Utc::now();
        let expires_at = chrono::Duration::from_std(self.inner.lock_duration)
            .ok()
            .and_then(|ttl| locked_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        // The task cannot observe the seat before this guard is released.
        let task = tokio::spawn(expire_after(
            Arc::downgrade(&self.inner),
            self.inner.lock_duration,
            seat_id.to_string(),
            token.clone(),
        ));

        seat.transition(Seat::Locked(Hold {
            token: token.clone(),
            locked_at,
            expiry: ExpiryTimer::new(task.abort_handle()),
        }));

        self.inner.publish(SeatEvent::SeatLocked {
            seat_id: seat_id.to_string(),
            at: locked_at.timestamp(),
            expires_at: expires_at.timestamp(),
        });
        info!(seat_id, %expires_at, "Seat locked");

        Ok(SeatLock {
            seat_id: seat_id.to_string(),
            lock_token: token,
            locked_at,
            expires_at,
        })
    }

    /// Turns a held lock into a booking.
    pub async fn confirm(&self, seat_id: &str, token: &str) -> SeatResult<()> {
        let mut seats = self.inner.seats.lock().await;
        let seat = Self::held_seat(&mut seats, seat_id, token)?;

        seat.transition(Seat::Booked);

        self.inner.publish(SeatEvent::SeatConfirmed {
            seat_id: seat_id.to_string(),
            at: Utc::now().timestamp(),
        });
        info!(seat_id, "Seat booked");
        Ok(())
    }

    /// Releases a held lock back to available.
    pub async fn unlock(&self, seat_id: &str, token: &str) -> SeatResult<()> {
        let mut seats = self.inner.seats.lock().await;
        let seat = Self::held_seat(&mut seats, seat_id, token)?;

        seat.transition(Seat::Available);

        self.inner.publish(SeatEvent::SeatUnlocked {
            seat_id: seat_id.to_string(),
            at: Utc::now().timestamp(),
        });
        info!(seat_id, "Seat unlocked");
        Ok(())
    }

    /// Forces every seat back to available, cancelling all pending expiries.
    pub async fn reset(&self) {
        let mut seats = self.inner.seats.lock().await;
        for seat in seats.values_mut() {
            seat.transition(Seat::Available);
        }

        self.inner.publish(SeatEvent::SeatsReset {
            at: Utc::now().timestamp(),
        });
        info!(seats = seats.len(), "All seats reset to available");
    }

    fn held_seat<'a>(
        seats: &'a mut BTreeMap<String, Seat>,
        seat_id: &str,
        token: &str,
    ) -> SeatResult<&'a mut Seat> {
        let seat = seats
            .get_mut(seat_id)
            .ok_or_else(|| SeatError::NotFound(seat_id.to_string()))?;

        if let Err(e) = seat.check_hold(seat_id, token) {
            debug!(seat_id, "Hold check failed: {}", e);
            return Err(e);
        }
        Ok(seat)
    }
}

impl EngineInner {
    fn publish(&self, event: SeatEvent) {
        // No subscribers is the common case.
        let _ = self.events.send(event);
    }

    /// Releases the seat only if it is still held by the lock that scheduled
    /// this expiry. Anything else means the timer is stale.
    async fn expire(&self, seat_id: &str, token: &LockToken) {
        let mut seats = self.seats.lock().await;
        let Some(seat) = seats.get_mut(seat_id) else {
            return;
        };

        if !seat.is_held_by(token) {
            debug!(seat_id, "Stale expiry ignored");
            return;
        }

        let locked_at = match &*seat {
            Seat::Locked(hold) => Some(hold.locked_at),
            _ => None,
        };
        seat.transition(Seat::Available);

        self.publish(SeatEvent::SeatExpired {
            seat_id: seat_id.to_string(),
            at: Utc::now().timestamp(),
        });
        info!(seat_id, ?locked_at, "Auto-unlocked seat after timeout");
    }
}

async fn expire_after(inner: Weak<EngineInner>, after: Duration, seat_id: String, token: LockToken) {
    tokio::time::sleep(after).await;

    if let Some(inner) = inner.upgrade() {
        inner.expire(&seat_id, &token).await;
    }
}
