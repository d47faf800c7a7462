use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Timelike, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use hansom_booking::{Booking, BookingStatus, NewBooking};
use hansom_fare::{compute_fare, schedule};

use crate::error::ApiError;
use crate::quotes::resolve_trip_distance;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Create-booking payload. The required fields deserialize as `Option`
/// so an omitted key and an empty string both fail the same
/// missing-field validation in the store.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub dropoff_address: Option<String>,
    #[serde(default)]
    pub waypoint_address: Option<String>,
    /// Omitted means as soon as possible
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: u32,
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
    /// Client-side estimate, kept only when the resolver is out
    #[serde(default)]
    pub distance_miles: Option<f64>,
    /// Client-side quote, kept only when the resolver is out
    #[serde(default)]
    pub quoted_total: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_passenger_count() -> u32 {
    1
}

fn default_vehicle_type() -> String {
    "sedan".to_string()
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub phone: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/status", post(transition_booking))
        .route(
            "/v1/bookings/{id}/messages/{message_id}/read",
            post(mark_message_read),
        )
}

/// POST /v1/bookings
/// Take a reservation. The fare is computed server-side; client figures
/// only survive when the distance service is unreachable.
async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let scheduled_at = req.scheduled_at.unwrap_or_else(Utc::now);
    let pickup_address = req.pickup_address.unwrap_or_default();
    let dropoff_address = req.dropoff_address.unwrap_or_default();

    // 1. Price the trip; a resolver outage must not block the reservation
    let (distance_miles, price) = match resolve_trip_distance(
        state.resolver.as_ref(),
        &pickup_address,
        req.waypoint_address.as_deref(),
        &dropoff_address,
    )
    .await
    {
        Ok(miles) => {
            let night_rate = schedule::is_night_hour(scheduled_at.hour());
            let pricing = state.pricing.get().await;
            match compute_fare(miles, night_rate, &pricing) {
                Ok(fare) => (Some(fare.distance_miles), Some(fare.total)),
                Err(e) => {
                    warn!(error = %e, "Fare computation failed, keeping client estimate");
                    (req.distance_miles, req.quoted_total)
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "Distance resolver unavailable, keeping client estimate");
            (req.distance_miles, req.quoted_total)
        }
    };

    // 2. Record and announce
    let booking = state
        .engine
        .create(NewBooking {
            customer_name: req.customer_name.unwrap_or_default(),
            customer_phone: req.customer_phone.unwrap_or_default(),
            customer_email: req.customer_email,
            pickup_address,
            dropoff_address,
            waypoint_address: req.waypoint_address,
            scheduled_at,
            passenger_count: req.passenger_count,
            vehicle_type: req.vehicle_type,
            distance_miles,
            price,
            notes: req.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /v1/bookings
/// All bookings newest first, optionally narrowed to one customer phone.
async fn list_bookings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Booking>> {
    Json(state.store.list(params.phone.as_deref()).await)
}

/// GET /v1/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.store.get(id).await?))
}

/// POST /v1/bookings/{id}/status
async fn transition_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<Booking>, ApiError> {
    let next: BookingStatus = req.status.parse().map_err(ApiError::BadRequest)?;
    Ok(Json(state.engine.transition(id, next).await?))
}

/// POST /v1/bookings/{id}/messages/{message_id}/read
async fn mark_message_read(
    State(state): State<AppState>,
    Path((id, message_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.engine.mark_message_read(id, message_id).await?;
    Ok(Json(json!({ "ok": true })))
}
