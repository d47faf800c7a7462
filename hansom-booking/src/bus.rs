use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use crate::events::BookingEvent;

/// In-process fan-out for booking events.
///
/// Every subscriber gets its own unbounded channel, so a slow consumer
/// never drops or delays events for the others. Subscribers whose
/// receiver has gone away are pruned on the next publish.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<RwLock<HashMap<u64, mpsc::UnboundedSender<BookingEvent>>>>,
    next_id: Arc<AtomicU64>,
}

/// A live subscription. Dropping the receiver ends it; the bus notices
/// on the next publish.
pub struct Subscription {
    pub id: u64,
    pub rx: mpsc::UnboundedReceiver<BookingEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub async fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.insert(id, tx);
        debug!(subscriber_id = id, "Event subscriber attached");
        Subscription { id, rx }
    }

    pub async fn unsubscribe(&self, id: u64) {
        if self.subscribers.write().await.remove(&id).is_some() {
            debug!(subscriber_id = id, "Event subscriber detached");
        }
    }

    /// Deliver an event to every live subscriber, pruning dead ones
    pub async fn publish(&self, event: BookingEvent) {
        let mut subscribers = self.subscribers.write().await;
        let mut dead = Vec::new();

        for (id, tx) in subscribers.iter() {
            if tx.send(event.clone()).is_err() {
                dead.push(*id);
            }
        }

        for id in dead {
            subscribers.remove(&id);
            debug!(subscriber_id = id, "Pruned dead event subscriber");
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::BookingStatus;
    use uuid::Uuid;

    fn status_event(status: BookingStatus) -> BookingEvent {
        BookingEvent::StatusUpdated {
            id: Uuid::new_v4(),
            status,
        }
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_each_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe().await;
        let mut second = bus.subscribe().await;

        bus.publish(status_event(BookingStatus::Confirmed)).await;

        assert!(matches!(
            first.rx.recv().await,
            Some(BookingEvent::StatusUpdated { status: BookingStatus::Confirmed, .. })
        ));
        assert!(matches!(
            second.rx.recv().await,
            Some(BookingEvent::StatusUpdated { status: BookingStatus::Confirmed, .. })
        ));
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe().await;

        bus.publish(status_event(BookingStatus::Confirmed)).await;
        bus.publish(status_event(BookingStatus::PaymentSent)).await;
        bus.publish(status_event(BookingStatus::Paid)).await;

        let mut seen = Vec::new();
        for _ in 0..3 {
            match sub.rx.recv().await {
                Some(BookingEvent::StatusUpdated { status, .. }) => seen.push(status),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        assert_eq!(
            seen,
            vec![
                BookingStatus::Confirmed,
                BookingStatus::PaymentSent,
                BookingStatus::Paid
            ]
        );
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned_and_others_still_served() {
        let bus = EventBus::new();
        let dropped = bus.subscribe().await;
        let mut alive = bus.subscribe().await;
        assert_eq!(bus.subscriber_count().await, 2);

        drop(dropped.rx);
        bus.publish(status_event(BookingStatus::Confirmed)).await;

        assert_eq!(bus.subscriber_count().await, 1);
        assert!(alive.rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let sub = bus.subscribe().await;

        bus.unsubscribe(sub.id).await;
        assert_eq!(bus.subscriber_count().await, 0);

        // Publishing with no subscribers is a no-op
        bus.publish(status_event(BookingStatus::Confirmed)).await;
    }

    #[tokio::test]
    async fn test_publish_with_no_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(status_event(BookingStatus::Cancelled)).await;
        assert_eq!(bus.subscriber_count().await, 0);
    }
}
