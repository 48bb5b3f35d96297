use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use crate::id::WindowId;

/// Application-level lifecycle events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AppEvent {
    Ready,
    ConfigLoaded,
    WindowCreated(WindowId),
    WindowClosed(WindowId),
    WindowAllClosed,
    BeforeQuit,
    #[serde(other)]
    Unknown,
}

/// Broadcast bus for [`AppEvent`]s.
///
/// Any part of the shell can subscribe; publishing never blocks and never
/// fails, it just reports how many receivers saw the event.
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AppEvent) -> usize {
        trace!(?event, "app event published");
        self.sender.send(event).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::Ready);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::Ready));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(AppEvent::BeforeQuit);

        let e1 = rx1.recv().await.unwrap();
        let e2 = rx2.recv().await.unwrap();
        assert!(matches!(e1, AppEvent::BeforeQuit));
        assert!(matches!(e2, AppEvent::BeforeQuit));
    }

    #[tokio::test]
    async fn window_lifecycle_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        let id = WindowId(3);

        bus.publish(AppEvent::WindowCreated(id));
        bus.publish(AppEvent::WindowClosed(id));
        bus.publish(AppEvent::WindowAllClosed);

        let e1 = rx.recv().await.unwrap();
        assert!(matches!(e1, AppEvent::WindowCreated(w) if w == WindowId(3)));

        let e2 = rx.recv().await.unwrap();
        assert!(matches!(e2, AppEvent::WindowClosed(w) if w == WindowId(3)));

        let e3 = rx.recv().await.unwrap();
        assert!(matches!(e3, AppEvent::WindowAllClosed));
    }

    #[test]
    fn publish_returns_zero_with_no_subscribers() {
        let bus = EventBus::new(16);
        let count = bus.publish(AppEvent::Ready);
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn publish_returns_subscriber_count() {
        let bus = EventBus::new(16);
        let _rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();

        let count = bus.publish(AppEvent::ConfigLoaded);
        assert_eq!(count, 2);
    }

    #[test]
    fn unknown_event_deserializes() {
        let json = r#"{"type":"SomeNewEventWeNeverHeardOf","data":null}"#;
        let event: AppEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, AppEvent::Unknown));
    }
}
