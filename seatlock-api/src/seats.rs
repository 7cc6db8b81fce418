use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use seatlock_shared::SeatStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockResponse {
    pub message: String,
    pub lock_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockIdRequest {
    #[serde(default)]
    pub lock_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/seats", get(list_seats))
        .route("/lock/{id}", post(lock_seat))
        .route("/confirm/{id}", post(confirm_seat))
        .route("/unlock/{id}", post(unlock_seat))
        .route("/reset", post(reset_seats))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /seats
pub async fn list_seats(State(state): State<AppState>) -> Json<BTreeMap<String, SeatStatus>> {
    Json(state.engine.list_seats().await)
}

/// POST /lock/:id
pub async fn lock_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
) -> Result<Json<LockResponse>, AppError> {
    let lock = state.engine.lock(&seat_id).await?;

    Ok(Json(LockResponse {
        message: format!(
            "Seat {} locked successfully. Confirm within {}.",
            seat_id,
            describe_window(state.engine.lock_duration())
        ),
        lock_id: lock.lock_token.into_string(),
        expires_at: lock.expires_at,
    }))
}

/// POST /confirm/:id
pub async fn confirm_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    payload: Result<Json<LockIdRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let lock_id = lock_id_from(payload);
    state.engine.confirm(&seat_id, &lock_id).await?;

    Ok(Json(MessageResponse {
        message: format!("Seat {} booked successfully.", seat_id),
    }))
}

/// POST /unlock/:id
pub async fn unlock_seat(
    State(state): State<AppState>,
    Path(seat_id): Path<String>,
    payload: Result<Json<LockIdRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let lock_id = lock_id_from(payload);
    state.engine.unlock(&seat_id, &lock_id).await?;

    Ok(Json(MessageResponse {
        message: format!("Seat {} unlocked successfully.", seat_id),
    }))
}

/// POST /reset
pub async fn reset_seats(State(state): State<AppState>) -> Json<MessageResponse> {
    state.engine.reset().await;

    Json(MessageResponse {
        message: "All seats reset to available.".to_string(),
    })
}

/// A missing or unreadable body carries no lock id, which never matches a
/// live lock; the engine still reports unknown or unlocked seats first.
fn lock_id_from(payload: Result<Json<LockIdRequest>, JsonRejection>) -> String {
    match payload {
        Ok(Json(req)) => req.lock_id.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!("Lock id body rejected: {}", rejection);
            String::new()
        }
    }
}

fn describe_window(window: Duration) -> String {
    if window.subsec_millis() != 0 || window.as_secs() == 0 {
        return format!("{} ms", window.as_millis());
    }

    match window.as_secs() {
        60 => "1 minute".to_string(),
        s if s > 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{} seconds", s),
    }
}
