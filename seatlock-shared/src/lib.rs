pub mod models;

pub use models::events::SeatEvent;
pub use models::seat::{SeatState, SeatStatus};
