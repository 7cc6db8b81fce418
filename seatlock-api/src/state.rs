use seatlock_core::ReservationEngine;

#[derive(Clone)]
pub struct AppState {
    pub engine: ReservationEngine,
}
