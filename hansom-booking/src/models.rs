use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::status::BookingStatus;

/// A rider identity, keyed by digits-only phone number.
///
/// Created lazily on first booking; a later booking from the same phone
/// keeps the original name and email (first-write-wins).
#[derive(Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    /// Digits-only canonical key, e.g. "5551234567"
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: String, phone: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            email,
            created_at: Utc::now(),
        }
    }
}

// Phone and email stay out of log output
impl fmt::Debug for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Customer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("phone", &"********")
            .field("email", &"********")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Who a generated message is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Customer,
    Operator,
}

/// A notification generated on a status transition.
///
/// Immutable once created except for the `read` flag, which is the only
/// client-mutable field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemMessage {
    pub id: Uuid,
    pub recipient: Recipient,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl SystemMessage {
    pub fn new(recipient: Recipient, title: String, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            title,
            body,
            created_at: Utc::now(),
            read: false,
        }
    }
}

/// When each status was first entered. A slot is stamped exactly once
/// and stays null for statuses the booking never reached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusHistory {
    pub pending: Option<DateTime<Utc>>,
    pub confirmed: Option<DateTime<Utc>>,
    pub payment_sent: Option<DateTime<Utc>>,
    pub paid: Option<DateTime<Utc>>,
    pub on_the_way: Option<DateTime<Utc>>,
    pub arrived: Option<DateTime<Utc>>,
    pub in_progress: Option<DateTime<Utc>>,
    pub completed: Option<DateTime<Utc>>,
    pub cancelled: Option<DateTime<Utc>>,
}

impl StatusHistory {
    /// Record when `status` was first entered; later stamps are ignored
    pub fn stamp(&mut self, status: BookingStatus, at: DateTime<Utc>) {
        let slot = self.slot_mut(status);
        if slot.is_none() {
            *slot = Some(at);
        }
    }

    /// When the booking first entered `status`, if it ever has
    pub fn entered_at(&self, status: BookingStatus) -> Option<DateTime<Utc>> {
        match status {
            BookingStatus::Pending => self.pending,
            BookingStatus::Confirmed => self.confirmed,
            BookingStatus::PaymentSent => self.payment_sent,
            BookingStatus::Paid => self.paid,
            BookingStatus::OnTheWay => self.on_the_way,
            BookingStatus::Arrived => self.arrived,
            BookingStatus::InProgress => self.in_progress,
            BookingStatus::Completed => self.completed,
            BookingStatus::Cancelled => self.cancelled,
        }
    }

    fn slot_mut(&mut self, status: BookingStatus) -> &mut Option<DateTime<Utc>> {
        match status {
            BookingStatus::Pending => &mut self.pending,
            BookingStatus::Confirmed => &mut self.confirmed,
            BookingStatus::PaymentSent => &mut self.payment_sent,
            BookingStatus::Paid => &mut self.paid,
            BookingStatus::OnTheWay => &mut self.on_the_way,
            BookingStatus::Arrived => &mut self.arrived,
            BookingStatus::InProgress => &mut self.in_progress,
            BookingStatus::Completed => &mut self.completed,
            BookingStatus::Cancelled => &mut self.cancelled,
        }
    }
}

/// Input for creating a booking. Customer fields resolve (or lazily
/// create) the customer record; address and schedule fields go onto the
/// booking itself.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub waypoint_address: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub passenger_count: u32,
    pub vehicle_type: String,
    /// Resolved trip distance; advisory when the resolver was unreachable
    pub distance_miles: Option<f64>,
    /// Server-computed fare; advisory when the resolver was unreachable
    pub price: Option<f64>,
    pub notes: Option<String>,
}

/// A single car reservation and everything recorded about it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub waypoint_address: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub passenger_count: u32,
    pub vehicle_type: String,
    pub distance_miles: Option<f64>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub history: StatusHistory,
    /// Seconds the driver waited between arrival and ride start
    pub wait_seconds: Option<i64>,
    /// Most recent first
    pub messages: Vec<SystemMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a fresh booking in `pending` with that history slot stamped
    pub fn create(customer_id: Uuid, new: NewBooking) -> Self {
        let now = Utc::now();
        let mut history = StatusHistory::default();
        history.stamp(BookingStatus::Pending, now);

        Self {
            id: Uuid::new_v4(),
            customer_id,
            pickup_address: new.pickup_address,
            dropoff_address: new.dropoff_address,
            waypoint_address: new.waypoint_address,
            scheduled_at: new.scheduled_at,
            passenger_count: new.passenger_count,
            vehicle_type: new.vehicle_type,
            distance_miles: new.distance_miles,
            price: new.price,
            notes: new.notes,
            status: BookingStatus::Pending,
            history,
            wait_seconds: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
