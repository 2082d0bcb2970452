use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::events::EmailUnverifiedEvent;
use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserCreatedEvent;

/// Serializable envelope for all user-related events.
///
/// The `topic` field carries the event name subscribers filter on
/// (`User/Created`, `User/EmailUnverified`, `User/PasswordResetRequested`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEventMessage {
    pub topic: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_password: Option<String>,
}

impl From<&UserCreatedEvent> for UserEventMessage {
    fn from(event: &UserCreatedEvent) -> Self {
        Self {
            topic: UserCreatedEvent::TOPIC.to_string(),
            user_id: event.user_id.clone(),
            name: event.name.clone(),
            email: event.email.clone(),
            verification_token: Some(event.verification_token.clone()),
            one_time_password: None,
        }
    }
}

impl From<&EmailUnverifiedEvent> for UserEventMessage {
    fn from(event: &EmailUnverifiedEvent) -> Self {
        Self {
            topic: EmailUnverifiedEvent::TOPIC.to_string(),
            user_id: event.user_id.clone(),
            name: event.name.clone(),
            email: event.email.clone(),
            verification_token: Some(event.verification_token.clone()),
            one_time_password: None,
        }
    }
}

impl From<&PasswordResetRequestedEvent> for UserEventMessage {
    fn from(event: &PasswordResetRequestedEvent) -> Self {
        Self {
            topic: PasswordResetRequestedEvent::TOPIC.to_string(),
            user_id: event.user_id.clone(),
            name: event.name.clone(),
            email: event.email.clone(),
            verification_token: None,
            one_time_password: Some(event.one_time_password.clone()),
        }
    }
}
