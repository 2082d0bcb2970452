use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::user::events::EmailUnverifiedEvent;
use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserCreatedEvent;
use crate::domain::user::ports::EventPublisher;
use crate::outbound::events::messages::UserEventMessage;
use crate::user::errors::EventPublisherError;

const DEFAULT_CAPACITY: usize = 256;

/// In-process event bus backed by a tokio broadcast channel.
///
/// Subscribers (mail sender, audit sink) attach via [`subscribe`] and filter
/// on the message topic. Delivery is fire-and-forget: a bus with no
/// subscribers drops messages silently, and a lagging subscriber loses the
/// oldest ones.
///
/// [`subscribe`]: BroadcastEventBus::subscribe
#[derive(Debug, Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<UserEventMessage>,
}

impl BroadcastEventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new receiving end. Only messages published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<UserEventMessage> {
        self.sender.subscribe()
    }

    fn publish(&self, message: UserEventMessage) -> Result<(), EventPublisherError> {
        tracing::debug!(topic = %message.topic, user_id = %message.user_id, "Publishing event");

        // send only fails when no receiver exists, which is not an error for
        // a fire-and-forget bus
        let _ = self.sender.send(message);

        Ok(())
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventBus {
    async fn publish_user_created(
        &self,
        event: &UserCreatedEvent,
    ) -> Result<(), EventPublisherError> {
        self.publish(UserEventMessage::from(event))
    }

    async fn publish_email_unverified(
        &self,
        event: &EmailUnverifiedEvent,
    ) -> Result<(), EventPublisherError> {
        self.publish(UserEventMessage::from(event))
    }

    async fn publish_password_reset_requested(
        &self,
        event: &PasswordResetRequestedEvent,
    ) -> Result<(), EventPublisherError> {
        self.publish(UserEventMessage::from(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::events::UserCreatedEvent;

    fn created_event() -> UserCreatedEvent {
        UserCreatedEvent {
            user_id: "7e0cf5a0-8cbb-4f45-a9c8-2ab0cfb1d8a0".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            verification_token: "token-123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = BroadcastEventBus::new();
        let mut rx = bus.subscribe();

        bus.publish_user_created(&created_event()).await.unwrap();

        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, "User/Created");
        assert_eq!(message.email, "ada@example.com");
        assert_eq!(message.verification_token.as_deref(), Some("token-123"));
        assert!(message.one_time_password.is_none());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_not_an_error() {
        let bus = BroadcastEventBus::new();

        assert!(bus.publish_user_created(&created_event()).await.is_ok());
    }
}
