use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_SEAT_COUNT: u32 = 10;

/// How long a lock survives without being confirmed or released.
pub const LOCK_DURATION_MS: u64 = 60_000;

/// Pool size and lock window, fixed for the lifetime of an engine.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReservationRules {
    #[serde(default = "default_seat_count")]
    pub seat_count: u32,
    #[serde(default = "default_lock_duration_ms")]
    pub lock_duration_ms: u64,
}

fn default_seat_count() -> u32 { DEFAULT_SEAT_COUNT }
fn default_lock_duration_ms() -> u64 { LOCK_DURATION_MS }

impl ReservationRules {
    pub fn lock_duration(&self) -> Duration {
        Duration::from_millis(self.lock_duration_ms)
    }

    /// Seat identifiers "1" through "seat_count".
    pub fn seat_ids(&self) -> impl Iterator<Item = String> {
        (1..=self.seat_count).map(|n| n.to_string())
    }
}

impl Default for ReservationRules {
    fn default() -> Self {
        Self {
            seat_count: DEFAULT_SEAT_COUNT,
            lock_duration_ms: LOCK_DURATION_MS,
        }
    }
}
