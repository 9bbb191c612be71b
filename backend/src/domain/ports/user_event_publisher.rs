//! Port for fanning user lifecycle events out to subscribers.

use async_trait::async_trait;

use crate::domain::UserEvent;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event publisher adapters.
    pub enum UserEventPublishError {
        /// The transport refused the event, for example after shutdown.
        Transport { message: String } =>
            "user event publish failed: {message}",
    }
}

/// Publishes [`UserEvent`]s to whoever is listening.
///
/// Publishing with no subscribers succeeds.
#[async_trait]
pub trait UserEventPublisher: Send + Sync {
    /// Deliver one event.
    async fn publish(&self, event: UserEvent) -> Result<(), UserEventPublishError>;
}
