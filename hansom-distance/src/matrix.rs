use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{DistanceError, DistanceResolver};

pub const METERS_PER_MILE: f64 = 1609.34;

/// Client for a Google-style distance matrix endpoint.
///
/// Requests imperial units but reads the metric `value` field, which is
/// always meters, and converts to miles itself. Log lines carry only
/// statuses and distances, never the addresses.
pub struct MatrixClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<MatrixDistance>,
}

#[derive(Debug, Deserialize)]
struct MatrixDistance {
    /// Meters, whatever display units were requested
    value: f64,
}

impl MatrixClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DistanceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl DistanceResolver for MatrixClient {
    async fn distance_miles(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<f64, DistanceError> {
        let response: MatrixResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("units", "imperial"),
                ("origins", origin),
                ("destinations", destination),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            warn!(status = %response.status, "Distance matrix request rejected");
            return Err(DistanceError::Unavailable(format!(
                "matrix status {}",
                response.status
            )));
        }

        let element = response
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .ok_or_else(|| DistanceError::Unavailable("empty matrix response".to_string()))?;

        if element.status != "OK" {
            warn!(status = %element.status, "No route for requested trip");
            return Err(DistanceError::Unavailable(format!(
                "element status {}",
                element.status
            )));
        }

        let meters = element
            .distance
            .as_ref()
            .ok_or_else(|| DistanceError::Unavailable("element missing distance".to_string()))?
            .value;

        let miles = meters / METERS_PER_MILE;
        debug!(miles, "Resolved trip leg");
        Ok(miles)
    }
}
