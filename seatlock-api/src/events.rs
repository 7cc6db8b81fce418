use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    /// Only forward events for this seat. Resets are always forwarded.
    pub seat: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/seats/events", get(seat_events))
}

/// GET /seats/events
/// Server-sent stream of seat lifecycle events
pub async fn seat_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.engine.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(move |result| {
        let seat = filter.seat.clone();
        async move {
            let event = match result {
                Ok(event) => event,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Seat event subscriber lagged");
                    return None;
                }
            };

            if let (Some(wanted), Some(seat_id)) = (seat.as_deref(), event.seat_id()) {
                if wanted != seat_id {
                    return None;
                }
            }

            match Event::default().event(event.name()).json_data(&event) {
                Ok(sse) => Some(Ok(sse)),
                Err(e) => {
                    warn!("Failed to encode seat event: {}", e);
                    None
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
