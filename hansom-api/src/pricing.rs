use axum::{extract::State, routing::get, Json, Router};

use hansom_fare::{PricingConfig, PricingUpdate};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/admin/pricing", get(get_pricing).put(update_pricing))
}

/// GET /v1/admin/pricing
async fn get_pricing(State(state): State<AppState>) -> Json<PricingConfig> {
    Json(state.pricing.get().await)
}

/// PUT /v1/admin/pricing
/// Merge the supplied fields; one invalid field rejects the whole update.
async fn update_pricing(
    State(state): State<AppState>,
    Json(update): Json<PricingUpdate>,
) -> Result<Json<PricingConfig>, ApiError> {
    let updated = state.pricing.update(update).await?;
    Ok(Json(updated))
}
