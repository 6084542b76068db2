use dashmap::DashMap;
use storage::events::{EventPublisher, TastingEvent};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// One broadcast channel per tasting, created on first subscribe.
pub struct EventHub {
    channels: DashMap<Uuid, broadcast::Sender<TastingEvent>>,
    capacity: usize,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, tasting_id: Uuid) -> broadcast::Receiver<TastingEvent> {
        self.channels
            .entry(tasting_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Drops the tasting's channel once its last socket has gone.
    pub fn release(&self, tasting_id: Uuid) {
        self.channels
            .remove_if(&tasting_id, |_, tx| tx.receiver_count() == 0);
    }

    pub fn subscriber_count(&self, tasting_id: Uuid) -> usize {
        self.channels
            .get(&tasting_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl EventPublisher for EventHub {
    fn publish(&self, tasting_id: Uuid, event: TastingEvent) {
        let Some(tx) = self.channels.get(&tasting_id) else {
            debug!(tasting_id = %tasting_id, kind = event.kind(), "No listeners for event");
            return;
        };

        match tx.send(event) {
            Ok(delivered) => debug!(tasting_id = %tasting_id, delivered, "Event published"),
            Err(_) => debug!(tasting_id = %tasting_id, "Event dropped, listeners gone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_reach_only_their_tasting() {
        let hub = EventHub::new(8);
        let tasting = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut rx = hub.subscribe(tasting);
        let mut other_rx = hub.subscribe(other);
        let flight_id = Uuid::new_v4();

        hub.publish(tasting, TastingEvent::ScoresUpdated { flight_id });

        assert_eq!(rx.recv().await.unwrap(), TastingEvent::ScoresUpdated { flight_id });
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_listeners_is_silent() {
        let hub = EventHub::new(8);
        hub.publish(Uuid::new_v4(), TastingEvent::ScoresUpdated { flight_id: Uuid::nil() });

        let tasting = Uuid::new_v4();
        drop(hub.subscribe(tasting));
        hub.publish(tasting, TastingEvent::ScoresUpdated { flight_id: Uuid::nil() });
    }

    #[tokio::test]
    async fn test_release_keeps_live_channels() {
        let hub = EventHub::new(8);
        let tasting = Uuid::new_v4();
        let rx = hub.subscribe(tasting);

        hub.release(tasting);
        assert_eq!(hub.subscriber_count(tasting), 1);

        drop(rx);
        hub.release(tasting);
        assert_eq!(hub.subscriber_count(tasting), 0);
        assert!(hub.channels.is_empty());
    }

    #[tokio::test]
    async fn test_slow_listener_lags_instead_of_blocking() {
        let hub = EventHub::new(1);
        let tasting = Uuid::new_v4();
        let mut rx = hub.subscribe(tasting);

        for _ in 0..3 {
            hub.publish(tasting, TastingEvent::ScoresUpdated { flight_id: Uuid::nil() });
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_lifecycle_events_fan_out_in_order() {
        use std::sync::Arc;

        use storage::services::lifecycle::FlightLifecycle;
        use storage::store::MemoryStore;

        let store = Arc::new(MemoryStore::new());
        let hub = Arc::new(EventHub::new(8));
        let host = Uuid::new_v4();
        let tasting = store.insert_tasting(host, "Thursday reds").await;
        let flight = store.insert_flight(tasting.tasting_id, 300).await;
        let lifecycle = FlightLifecycle::new(store.clone(), hub.clone(), 3);
        let mut rx = hub.subscribe(tasting.tasting_id);

        lifecycle.set_timer(flight.flight_id, 5, host).await.unwrap();
        lifecycle.complete(flight.flight_id, host).await.unwrap();

        let kinds: Vec<_> = [
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
            rx.recv().await.unwrap(),
        ]
        .iter()
        .map(TastingEvent::kind)
        .collect();
        assert_eq!(kinds, vec!["timer_started", "flight_completed", "scores_updated"]);
    }
}
