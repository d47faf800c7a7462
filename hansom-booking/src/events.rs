use serde::Serialize;
use uuid::Uuid;

use crate::models::{Booking, Recipient};
use crate::status::BookingStatus;

/// Events fanned out to live observers.
///
/// Serialization is payload-only (untagged); the event name travels
/// separately in the SSE frame, mirroring the wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BookingEvent {
    /// A booking was just created, full record attached
    BookingCreated(Booking),
    /// A booking moved to a new status
    StatusUpdated { id: Uuid, status: BookingStatus },
    /// A system message was generated for a transition
    Notification {
        to: Recipient,
        booking_id: Uuid,
        title: String,
        body: String,
        status: BookingStatus,
    },
}

impl BookingEvent {
    /// Wire name used for SSE framing
    pub fn name(&self) -> &'static str {
        match self {
            Self::BookingCreated(_) => "booking_created",
            Self::StatusUpdated { .. } => "status_updated",
            Self::Notification { .. } => "notification",
        }
    }
}
