use serde::{Deserialize, Serialize};

/// Lifecycle state of a single seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    Locked,
    Booked,
}

/// Externally visible view of a seat. Lock tokens and timestamps never leave the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub state: SeatState,
}

impl From<SeatState> for SeatStatus {
    fn from(state: SeatState) -> Self {
        Self { state }
    }
}
