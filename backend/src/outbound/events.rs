//! In-process fan-out of user lifecycle events.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::UserEvent;
use crate::domain::ports::{UserEventPublishError, UserEventPublisher};

/// Default number of events buffered per subscriber before lagging.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Broadcast bus delivering [`UserEvent`]s to every live subscriber.
///
/// Subscribers that fall more than `capacity` events behind observe
/// `RecvError::Lagged` and skip ahead. Clones share one channel; after
/// [`close`](Self::close) subscribers drain and then see `RecvError::Closed`.
#[derive(Debug, Clone)]
pub struct InProcUserEventBus {
    sender: Arc<RwLock<Option<broadcast::Sender<UserEvent>>>>,
}

impl InProcUserEventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero, as `tokio::sync::broadcast` does.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(RwLock::new(Some(sender))),
        }
    }

    fn sender(&self) -> Option<broadcast::Sender<UserEvent>> {
        self.sender.read().ok().and_then(|guard| guard.clone())
    }

    /// Register a new subscriber; it sees events published from now on.
    ///
    /// On a closed bus the receiver reports `RecvError::Closed` immediately.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<UserEvent> {
        match self.sender() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender().map_or(0, |sender| sender.receiver_count())
    }

    /// Stop accepting events. Later publishes fail with
    /// [`UserEventPublishError::Transport`].
    pub fn close(&self) {
        let closed = match self.sender.write() {
            Ok(mut guard) => guard.take().is_some(),
            Err(poisoned) => poisoned.into_inner().take().is_some(),
        };
        if closed {
            info!("user event bus closed");
        }
    }
}

impl Default for InProcUserEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[async_trait]
impl UserEventPublisher for InProcUserEventBus {
    async fn publish(&self, event: UserEvent) -> Result<(), UserEventPublishError> {
        let name = event.name();
        let user_id = *event.user_id();
        let sender = self
            .sender()
            .ok_or_else(|| UserEventPublishError::transport(format!("bus closed, dropped {name}")))?;
        // `send` only fails when nobody is listening.
        let delivered = sender.send(event).unwrap_or(0);
        debug!(event = name, %user_id, delivered, "user event published");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreatedVia, UserCreationEvent, UserId, UserLoginEvent, UserRecord, Username};
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> UserRecord {
        UserRecord::new(
            UserId::random(),
            Username::new("ada").expect("fixture username"),
            "ada@example.com",
        )
    }

    #[rstest]
    #[tokio::test]
    async fn publish_without_subscribers_succeeds(record: UserRecord) {
        let bus = InProcUserEventBus::default();

        bus.publish(UserLoginEvent::new(record).into())
            .await
            .expect("publishing to nobody is fine");
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn every_subscriber_receives_each_event(record: UserRecord) {
        let bus = InProcUserEventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let event = UserEvent::from(UserCreationEvent::new(CreatedVia::OrgSignup, &record));

        bus.publish(event.clone()).await.expect("publish");

        assert_eq!(first.recv().await.expect("first receives"), event);
        assert_eq!(second.recv().await.expect("second receives"), event);
    }

    #[rstest]
    #[tokio::test]
    async fn late_subscribers_miss_earlier_events(record: UserRecord) {
        let bus = InProcUserEventBus::new(8);
        bus.publish(UserLoginEvent::new(record.clone()).into())
            .await
            .expect("publish");

        let mut late = bus.subscribe();
        let next = UserEvent::from(UserCreationEvent::new(CreatedVia::Api, &record));
        bus.publish(next.clone()).await.expect("publish");

        assert_eq!(late.recv().await.expect("receives"), next);
    }

    #[rstest]
    #[tokio::test]
    async fn closing_ends_subscriptions_and_rejects_publishes(record: UserRecord) {
        let bus = InProcUserEventBus::new(8);
        let mut subscriber = bus.subscribe();
        let shared = bus.clone();
        let event = UserEvent::from(UserLoginEvent::new(record.clone()));
        bus.publish(event.clone()).await.expect("publish before close");

        shared.close();

        assert_eq!(subscriber.recv().await.expect("buffered event"), event);
        assert!(matches!(
            subscriber.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
        let error = bus
            .publish(UserLoginEvent::new(record).into())
            .await
            .expect_err("closed bus rejects events");
        assert!(matches!(error, UserEventPublishError::Transport { .. }));
        assert_eq!(bus.subscriber_count(), 0);
        assert!(matches!(
            bus.subscribe().recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
