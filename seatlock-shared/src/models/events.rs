use serde::{Deserialize, Serialize};

/// Published by the reservation engine after every successful transition.
/// `at` is a unix timestamp in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeatEvent {
    SeatLocked { seat_id: String, at: i64, expires_at: i64 },
    SeatConfirmed { seat_id: String, at: i64 },
    SeatUnlocked { seat_id: String, at: i64 },
    SeatExpired { seat_id: String, at: i64 },
    SeatsReset { at: i64 },
}

impl SeatEvent {
    /// Event name used on the SSE stream.
    pub fn name(&self) -> &'static str {
        match self {
            SeatEvent::SeatLocked { .. } => "seat_locked",
            SeatEvent::SeatConfirmed { .. } => "seat_confirmed",
            SeatEvent::SeatUnlocked { .. } => "seat_unlocked",
            SeatEvent::SeatExpired { .. } => "seat_expired",
            SeatEvent::SeatsReset { .. } => "seats_reset",
        }
    }

    pub fn seat_id(&self) -> Option<&str> {
        match self {
            SeatEvent::SeatLocked { seat_id, .. }
            | SeatEvent::SeatConfirmed { seat_id, .. }
            | SeatEvent::SeatUnlocked { seat_id, .. }
            | SeatEvent::SeatExpired { seat_id, .. } => Some(seat_id),
            SeatEvent::SeatsReset { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tag_matches_stream_name() {
        let event = SeatEvent::SeatExpired { seat_id: "4".to_string(), at: 10 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.name());
        assert_eq!(json["seat_id"], "4");
        assert_eq!(event.seat_id(), Some("4"));
        assert_eq!(SeatEvent::SeatsReset { at: 10 }.seat_id(), None);
    }
}
