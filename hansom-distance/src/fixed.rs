use async_trait::async_trait;

use crate::{DistanceError, DistanceResolver};

/// Resolver that answers every lookup with the same distance.
///
/// Stands in for the live matrix service in tests and in deployments
/// that pin a flat distance instead of configuring an API key.
pub struct FixedResolver {
    miles: Option<f64>,
}

impl FixedResolver {
    pub fn new(miles: f64) -> Self {
        Self { miles: Some(miles) }
    }

    /// A resolver whose every lookup fails, for exercising fallbacks
    pub fn unavailable() -> Self {
        Self { miles: None }
    }
}

#[async_trait]
impl DistanceResolver for FixedResolver {
    async fn distance_miles(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<f64, DistanceError> {
        self.miles
            .ok_or_else(|| DistanceError::Unavailable("no distance configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fixed_resolver_returns_configured_miles() {
        let resolver = FixedResolver::new(7.5);
        let miles = resolver.distance_miles("A", "B").await.unwrap();
        assert_eq!(miles, 7.5);
    }

    #[tokio::test]
    async fn test_unavailable_resolver_always_errors() {
        let resolver = FixedResolver::unavailable();
        let result = resolver.distance_miles("A", "B").await;
        assert!(matches!(result, Err(DistanceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_usable_as_trait_object() {
        let resolver: Arc<dyn DistanceResolver> = Arc::new(FixedResolver::new(3.0));
        assert_eq!(resolver.distance_miles("A", "B").await.unwrap(), 3.0);
    }
}
