pub mod bus;
pub mod events;
pub mod lifecycle;
pub mod messages;
pub mod models;
pub mod status;
pub mod store;

pub use bus::{EventBus, Subscription};
pub use events::BookingEvent;
pub use lifecycle::LifecycleEngine;
pub use models::{Booking, Customer, NewBooking, Recipient, StatusHistory, SystemMessage};
pub use status::BookingStatus;
pub use store::{normalize_phone, BookingStore};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Customer already has a pending booking")]
    DuplicatePending,
    #[error("Booking not found: {0}")]
    NotFound(Uuid),
    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),
    #[error("Invalid status transition: {from} -> {requested}")]
    InvalidTransition {
        from: BookingStatus,
        requested: BookingStatus,
    },
}

pub type BookingResult<T> = Result<T, BookingError>;
