use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use hansom_booking::BookingError;
use hansom_distance::DistanceError;
use hansom_fare::FareError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    UpstreamUnavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UpstreamUnavailable(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingField(_) => Self::BadRequest(err.to_string()),
            BookingError::DuplicatePending | BookingError::InvalidTransition { .. } => {
                Self::Conflict(err.to_string())
            }
            BookingError::NotFound(_) | BookingError::MessageNotFound(_) => {
                Self::NotFound(err.to_string())
            }
        }
    }
}

impl From<FareError> for ApiError {
    fn from(err: FareError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<DistanceError> for ApiError {
    fn from(err: DistanceError) -> Self {
        Self::UpstreamUnavailable(err.to_string())
    }
}
