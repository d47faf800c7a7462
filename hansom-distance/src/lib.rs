pub mod fixed;
pub mod matrix;

pub use fixed::FixedResolver;
pub use matrix::MatrixClient;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DistanceError {
    #[error("Distance lookup failed: {0}")]
    Unavailable(String),
    #[error("Distance service request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Resolves the road distance between two street addresses.
///
/// The booking flow treats any resolver failure as soft: the trip is
/// still accepted, just without a server-computed fare.
#[async_trait]
pub trait DistanceResolver: Send + Sync {
    /// Road distance in miles from `origin` to `destination`
    async fn distance_miles(&self, origin: &str, destination: &str)
        -> Result<f64, DistanceError>;
}
