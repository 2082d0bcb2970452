use async_trait::async_trait;

use crate::domain::user::events::EmailUnverifiedEvent;
use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserCreatedEvent;
use crate::domain::user::models::LoginAttempt;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::EventPublisherError;
use crate::user::errors::UserError;

/// Port for credential and account lifecycle operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Create a new user account.
    ///
    /// The account starts unverified; a `User/Created` event carrying the
    /// verification token is emitted after the user is persisted. Signup
    /// does not log the user in.
    ///
    /// # Errors
    /// * `Account(WeakPassword)` - Password fails the strength policy
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError>;

    /// Authenticate a user by email and password.
    ///
    /// Verification state is not a login gate: an unverified account can
    /// still log in. Every attempt is recorded for auditing.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `CredentialsIncorrect` - Password does not match
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str, client_ip: &str)
        -> Result<User, UserError>;

    /// Retrieve a user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn fetch_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Update a user's profile and credentials.
    ///
    /// Only provided fields are touched. A password change requires both the
    /// old and the new password and is skipped silently otherwise. Changing
    /// the email drops the account back to unverified and emits a
    /// `User/EmailUnverified` event after the save.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Account(PasswordMismatch)` - Old password does not match
    /// * `Account(WeakPassword)` - New password fails the strength policy
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Begin a password reset for the account with this email.
    ///
    /// Generates and persists a one-time password, then emits a
    /// `User/PasswordResetRequested` event so the notification channel can
    /// deliver it out-of-band.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Database operation failed
    async fn request_password_reset(&self, email: &str) -> Result<(), UserError>;

    /// Complete a password reset by consuming a one-time password.
    ///
    /// # Errors
    /// * `NotFound` - No account has an active reset window for this value
    /// * `Account(OneTimePasswordIncorrect)` - Value does not match
    /// * `Account(WeakPassword)` - New password fails the strength policy
    /// * `DatabaseError` - Database operation failed
    async fn reset_password(&self, otp: &str, new_password: &str) -> Result<(), UserError>;

    /// Mark the email behind this verification token as verified.
    ///
    /// A token that matches nothing is treated as a benign no-op: the link
    /// was already used or never existed, and verification links may be
    /// clicked twice harmlessly.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn verify_email(&self, token: &str) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
///
/// All lookups return "not found" as an explicit `None`, not an error.
/// `save` has upsert semantics and relies on the store for row-level
/// atomicity of a single user's read-modify-write.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve a user by an outstanding email-verification token.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, UserError>;

    /// Retrieve a user by an outstanding one-time password.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_one_time_password(&self, otp: &str) -> Result<Option<User>, UserError>;

    /// Persist a user (insert or update).
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered to another user
    /// * `DatabaseError` - Database operation failed
    async fn save(&self, user: User) -> Result<User, UserError>;
}

/// Audit log for login attempts.
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync + 'static {
    /// Persist a login attempt record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn record(&self, attempt: LoginAttempt) -> Result<(), UserError>;
}

/// Event publishing for domain events.
///
/// Fire-and-forget, at-most-once delivery from the service's perspective;
/// the service does not retry.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish a `User/Created` event.
    async fn publish_user_created(
        &self,
        event: &UserCreatedEvent,
    ) -> Result<(), EventPublisherError>;

    /// Publish a `User/EmailUnverified` event.
    async fn publish_email_unverified(
        &self,
        event: &EmailUnverifiedEvent,
    ) -> Result<(), EventPublisherError>;

    /// Publish a `User/PasswordResetRequested` event.
    async fn publish_password_reset_requested(
        &self,
        event: &PasswordResetRequestedEvent,
    ) -> Result<(), EventPublisherError>;
}
