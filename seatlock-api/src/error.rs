use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatlock_core::SeatError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFoundError(String),
    #[error("{0}")]
    ConflictError(String),
    #[error("{0}")]
    InvalidTokenError(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFoundError(_) => StatusCode::NOT_FOUND,
            // Clients of the booking API expect 400 for both.
            AppError::ConflictError(_) | AppError::InvalidTokenError(_) => StatusCode::BAD_REQUEST,
            AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

impl From<SeatError> for AppError {
    fn from(err: SeatError) -> Self {
        let message = err.to_string();
        match err {
            SeatError::NotFound(_) => AppError::NotFoundError(message),
            SeatError::Conflict { .. } => AppError::ConflictError(message),
            SeatError::InvalidToken(_) => AppError::InvalidTokenError(message),
        }
    }
}
