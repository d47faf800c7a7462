use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use hansom_distance::{DistanceError, DistanceResolver};
use hansom_fare::{compute_fare, schedule, FareBreakdown, Meridiem, PricingConfig};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub pickup: String,
    pub dropoff: String,
    #[serde(default)]
    pub waypoint: Option<String>,
    /// 12-hour clock like "7:30"; absent means daytime rates
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub ampm: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub fare: FareBreakdown,
    pub pricing: PricingConfig,
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/quotes", get(get_quote))
}

/// GET /v1/quotes
/// Price a trip without creating a booking.
async fn get_quote(
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<QuoteResponse>, ApiError> {
    if params.pickup.trim().is_empty() {
        return Err(ApiError::BadRequest("pickup is required".to_string()));
    }
    if params.dropoff.trim().is_empty() {
        return Err(ApiError::BadRequest("dropoff is required".to_string()));
    }

    // 1. Resolve trip distance, leg by leg
    let distance_miles = resolve_trip_distance(
        state.resolver.as_ref(),
        &params.pickup,
        params.waypoint.as_deref(),
        &params.dropoff,
    )
    .await?;

    // 2. Night or day rate from the requested pickup time
    let night_rate = match (&params.time, &params.ampm) {
        (Some(time), Some(ampm)) => {
            let meridiem: Meridiem = ampm.parse()?;
            schedule::night_rate(time, meridiem)?
        }
        _ => false,
    };

    // 3. Price it against the current config
    let pricing = state.pricing.get().await;
    let fare = compute_fare(distance_miles, night_rate, &pricing)?;
    debug!(distance_miles, night_rate, total = fare.total, "Quoted trip");

    Ok(Json(QuoteResponse { fare, pricing }))
}

/// Total road distance for a trip, summing legs around any waypoint
pub(crate) async fn resolve_trip_distance(
    resolver: &dyn DistanceResolver,
    pickup: &str,
    waypoint: Option<&str>,
    dropoff: &str,
) -> Result<f64, DistanceError> {
    match waypoint {
        Some(stop) if !stop.trim().is_empty() => {
            let first = resolver.distance_miles(pickup, stop).await?;
            let second = resolver.distance_miles(stop, dropoff).await?;
            Ok(first + second)
        }
        _ => resolver.distance_miles(pickup, dropoff).await,
    }
}
