pub mod pricing;
pub mod schedule;
pub mod store;

pub use pricing::{compute_fare, FareBreakdown, PricingConfig, PricingUpdate};
pub use schedule::Meridiem;
pub use store::PricingStore;

#[derive(Debug, thiserror::Error)]
pub enum FareError {
    #[error("Distance cannot be negative: {0}")]
    NegativeDistance(f64),

    #[error("Invalid trip time: {0}")]
    InvalidTime(String),

    #[error("Invalid value for pricing field: {0}")]
    InvalidConfig(&'static str),
}

pub type FareResult<T> = Result<T, FareError>;
