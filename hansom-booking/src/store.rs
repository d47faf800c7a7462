use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Booking, Customer, NewBooking};
use crate::status::BookingStatus;
use crate::BookingError;

/// Strip a phone number down to its digits.
/// "(555) 123-4567" and "5551234567" both key the same customer.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// In-memory booking and customer records behind a single lock.
///
/// All writes to an existing booking go through `mutate`, which applies
/// the change copy-on-write so a failed mutation never leaves a
/// half-updated record. Readers clone snapshots under the read lock.
/// Nothing persists across restarts.
pub struct BookingStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    customers: HashMap<Uuid, Customer>,
    /// Digits-only phone -> customer id
    phone_index: HashMap<String, Uuid>,
    bookings: HashMap<Uuid, Booking>,
    /// Insertion order, newest first
    order: Vec<Uuid>,
}

impl StoreInner {
    /// First-write-wins: a known phone keeps its original name and email
    fn resolve_customer(&mut self, name: &str, digits: &str, email: &str) -> Customer {
        if let Some(existing) = self.phone_index.get(digits).and_then(|id| self.customers.get(id)) {
            return existing.clone();
        }

        let customer = Customer::new(name.to_string(), digits.to_string(), email.to_string());
        self.phone_index.insert(digits.to_string(), customer.id);
        self.customers.insert(customer.id, customer.clone());
        customer
    }

    fn has_pending_booking(&self, customer_id: Uuid) -> bool {
        self.bookings
            .values()
            .any(|b| b.customer_id == customer_id && b.status == BookingStatus::Pending)
    }
}

impl BookingStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
        }
    }

    /// Look up a customer by phone, creating the record on first contact
    pub async fn find_or_create_customer(
        &self,
        name: &str,
        phone: &str,
        email: &str,
    ) -> Result<Customer, BookingError> {
        let digits = normalize_phone(phone);
        if digits.is_empty() {
            return Err(BookingError::MissingField("customer_phone"));
        }

        let mut inner = self.inner.write().await;
        Ok(inner.resolve_customer(name, &digits, email))
    }

    /// Insert a new booking in `pending`.
    ///
    /// Fails without touching any state when a required field is empty
    /// or the resolved customer already has a pending booking.
    pub async fn create(&self, new: NewBooking) -> Result<Booking, BookingError> {
        if new.pickup_address.trim().is_empty() {
            return Err(BookingError::MissingField("pickup_address"));
        }
        if new.dropoff_address.trim().is_empty() {
            return Err(BookingError::MissingField("dropoff_address"));
        }
        if new.customer_name.trim().is_empty() {
            return Err(BookingError::MissingField("customer_name"));
        }
        let digits = normalize_phone(&new.customer_phone);
        if digits.is_empty() {
            return Err(BookingError::MissingField("customer_phone"));
        }

        let mut inner = self.inner.write().await;
        let customer = inner.resolve_customer(&new.customer_name, &digits, &new.customer_email);

        // At most one pending booking per customer
        if inner.has_pending_booking(customer.id) {
            return Err(BookingError::DuplicatePending);
        }

        let booking = Booking::create(customer.id, new);
        inner.order.insert(0, booking.id);
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    /// Snapshot of one booking
    pub async fn get(&self, id: Uuid) -> Result<Booking, BookingError> {
        self.inner
            .read()
            .await
            .bookings
            .get(&id)
            .cloned()
            .ok_or(BookingError::NotFound(id))
    }

    /// Bookings newest first, optionally filtered by customer phone.
    /// An unknown phone matches nothing.
    pub async fn list(&self, phone: Option<&str>) -> Vec<Booking> {
        let inner = self.inner.read().await;

        let customer_id = match phone {
            Some(raw) => match inner.phone_index.get(&normalize_phone(raw)) {
                Some(id) => Some(*id),
                None => return Vec::new(),
            },
            None => None,
        };

        inner
            .order
            .iter()
            .filter_map(|id| inner.bookings.get(id))
            .filter(|b| customer_id.map_or(true, |cid| b.customer_id == cid))
            .cloned()
            .collect()
    }

    /// Snapshot of one customer record
    pub async fn customer(&self, id: Uuid) -> Option<Customer> {
        self.inner.read().await.customers.get(&id).cloned()
    }

    /// Run `f` against a booking under the write lock.
    ///
    /// The sole write path for existing bookings. `f` works on a copy;
    /// the stored record is replaced only when `f` succeeds, so an `Err`
    /// leaves the booking exactly as it was.
    pub async fn mutate<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Booking) -> Result<T, BookingError>,
    ) -> Result<(Booking, T), BookingError> {
        let mut inner = self.inner.write().await;
        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or(BookingError::NotFound(id))?;

        let mut draft = booking.clone();
        let out = f(&mut draft)?;
        draft.updated_at = chrono::Utc::now();
        *booking = draft.clone();
        Ok((draft, out))
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}
