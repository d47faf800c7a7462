use tokio::sync::RwLock;
use tracing::info;

use crate::{FareResult, PricingConfig, PricingUpdate};

/// Process-wide pricing configuration.
///
/// Reads hand out snapshots and updates swap a fully validated copy in
/// one step, so a concurrent quote never sees a half-merged config.
/// Nothing persists across restarts; defaults are re-seeded at startup.
pub struct PricingStore {
    config: RwLock<PricingConfig>,
}

impl PricingStore {
    pub fn new(config: PricingConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Current configuration snapshot
    pub async fn get(&self) -> PricingConfig {
        self.config.read().await.clone()
    }

    /// Merge the supplied fields over the current configuration.
    ///
    /// Every supplied field is validated first; one bad field rejects
    /// the whole update and leaves the configuration untouched.
    pub async fn update(&self, update: PricingUpdate) -> FareResult<PricingConfig> {
        update.validate()?;

        let mut current = self.config.write().await;
        let mut next = current.clone();
        update.apply_to(&mut next);
        *current = next.clone();

        info!(
            base_fare = next.base_fare,
            included_miles = next.included_miles,
            extra_per_mile = next.extra_per_mile,
            night_multiplier = next.night_multiplier,
            minimum_fare = next.minimum_fare,
            "pricing configuration updated"
        );

        Ok(next)
    }
}

impl Default for PricingStore {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}
