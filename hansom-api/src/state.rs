use std::sync::Arc;

use hansom_booking::{BookingStore, EventBus, LifecycleEngine};
use hansom_distance::DistanceResolver;
use hansom_fare::{PricingConfig, PricingStore};

#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingStore>,
    pub store: Arc<BookingStore>,
    pub engine: Arc<LifecycleEngine>,
    pub bus: EventBus,
    pub resolver: Arc<dyn DistanceResolver>,
}

impl AppState {
    pub fn new(pricing: PricingConfig, resolver: Arc<dyn DistanceResolver>) -> Self {
        let store = Arc::new(BookingStore::new());
        let bus = EventBus::new();
        let engine = Arc::new(LifecycleEngine::new(store.clone(), bus.clone()));

        Self {
            pricing: Arc::new(PricingStore::new(pricing)),
            store,
            engine,
            bus,
            resolver,
        }
    }
}
