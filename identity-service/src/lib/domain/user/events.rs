use crate::domain::user::models::User;

/// Domain event published after a new user is persisted.
///
/// A mail subscriber uses the verification token to send the welcome /
/// verify-your-email message.
#[derive(Debug, Clone)]
pub struct UserCreatedEvent {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub verification_token: String,
}

impl UserCreatedEvent {
    pub const TOPIC: &'static str = "User/Created";

    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.account.email().as_str().to_string(),
            verification_token: user.account.verification_token().to_string(),
        }
    }
}

/// Domain event published after an update leaves a user's email unverified
/// (a changed address needs re-verification).
#[derive(Debug, Clone)]
pub struct EmailUnverifiedEvent {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub verification_token: String,
}

impl EmailUnverifiedEvent {
    pub const TOPIC: &'static str = "User/EmailUnverified";

    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.account.email().as_str().to_string(),
            verification_token: user.account.verification_token().to_string(),
        }
    }
}

/// Domain event published after a password reset is requested and persisted.
///
/// Carries the one-time password for out-of-band delivery to the account
/// owner.
#[derive(Debug, Clone)]
pub struct PasswordResetRequestedEvent {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub one_time_password: String,
}

impl PasswordResetRequestedEvent {
    pub const TOPIC: &'static str = "User/PasswordResetRequested";

    pub fn new(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.account.email().as_str().to_string(),
            one_time_password: user.account.one_time_password().to_string(),
        }
    }
}
