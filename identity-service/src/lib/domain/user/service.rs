use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::domain::user::events::EmailUnverifiedEvent;
use crate::domain::user::events::PasswordResetRequestedEvent;
use crate::domain::user::events::UserCreatedEvent;
use crate::domain::user::models::LoginAttempt;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::EventPublisher;
use crate::user::ports::LoginAttemptRepository;
use crate::user::ports::UserRepository;

/// Domain service for credential and account lifecycle operations.
///
/// Wraps a store round-trip around the account transition logic: load,
/// mutate, persist, then emit any domain event as an explicit post-persist
/// step. No account state is held across calls.
pub struct CredentialService<UR, LR, EP>
where
    UR: UserRepository,
    LR: LoginAttemptRepository,
    EP: EventPublisher,
{
    repository: Arc<UR>,
    login_attempts: Arc<LR>,
    event_publisher: Arc<EP>,
    password_hasher: PasswordHasher,
}

impl<UR, LR, EP> CredentialService<UR, LR, EP>
where
    UR: UserRepository,
    LR: LoginAttemptRepository,
    EP: EventPublisher,
{
    /// Create a new credential service with injected dependencies.
    pub fn new(repository: Arc<UR>, login_attempts: Arc<LR>, event_publisher: Arc<EP>) -> Self {
        Self {
            repository,
            login_attempts,
            event_publisher,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Run a hashing closure on the blocking pool.
    ///
    /// Argon2 derivation is CPU-bound and must not stall the async runtime.
    async fn on_hashing_pool<T, F>(&self, f: F) -> Result<T, UserError>
    where
        F: FnOnce(&PasswordHasher) -> T + Send + 'static,
        T: Send + 'static,
    {
        let hasher = self.password_hasher.clone();
        tokio::task::spawn_blocking(move || f(&hasher))
            .await
            .map_err(|e| UserError::Unknown(format!("hashing task failed: {}", e)))
    }

    async fn audit_login(&self, email: &str, ip: &str, successful: bool) {
        let attempt = LoginAttempt::record(email, ip, successful);
        if let Err(e) = self.login_attempts.record(attempt).await {
            // Auditing must not break the login path
            tracing::error!(error = %e, "Failed to record login attempt");
        }
    }
}

#[async_trait]
impl<UR, LR, EP> CredentialServicePort for CredentialService<UR, LR, EP>
where
    UR: UserRepository,
    LR: LoginAttemptRepository,
    EP: EventPublisher,
{
    async fn signup(&self, command: SignupCommand) -> Result<User, UserError> {
        let SignupCommand {
            name,
            email,
            password,
        } = command;

        let user = self
            .on_hashing_pool(move |hasher| User::new(name, email, &password, hasher))
            .await?
            .map_err(|e| {
                tracing::warn!(error = %e, "Signup rejected");
                UserError::from(e)
            })?;

        let user = self.repository.save(user).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist new user");
            e
        })?;

        let event = UserCreatedEvent::new(&user);
        if let Err(e) = self.event_publisher.publish_user_created(&event).await {
            tracing::error!(
                "Failed to publish {} event for user {}: {}",
                UserCreatedEvent::TOPIC,
                user.id,
                e
            );
        }

        Ok(user)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        client_ip: &str,
    ) -> Result<User, UserError> {
        let user = match self.repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                self.audit_login(email, client_ip, false).await;
                tracing::warn!(email, "Login failed: unknown email");
                return Err(UserError::NotFound(format!(
                    "user with email '{}' not found",
                    email
                )));
            }
        };

        let candidate = user.clone();
        let submitted = password.to_string();
        let valid = self
            .on_hashing_pool(move |hasher| candidate.valid_password(&submitted, hasher))
            .await??;

        if !valid {
            self.audit_login(email, client_ip, false).await;
            tracing::warn!(email, "Login failed: bad credentials");
            return Err(UserError::CredentialsIncorrect);
        }

        self.audit_login(email, client_ip, true).await;

        Ok(user)
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        if let Some(new_name) = command.name {
            user.rename(new_name);
        }

        if let Some(new_email) = command.email {
            user.change_email(new_email);
        }

        // A password change needs proof of the current password; with either
        // half missing the field is silently left alone.
        if let (Some(new_password), Some(old_password)) =
            (command.new_password, command.old_password)
        {
            let (updated, result) = self
                .on_hashing_pool(move |hasher| {
                    let mut user = user;
                    let result = user.change_password(&new_password, &old_password, hasher);
                    (user, result)
                })
                .await?;
            user = updated;

            result.map_err(|e| {
                tracing::warn!(user_id = %id, error = %e, "Password change rejected");
                UserError::from(e)
            })?;
        }

        if let Some(pronouns) = command.pronouns {
            user.set_pronouns(&pronouns);
        }

        let user = self.repository.save(user).await.map_err(|e| {
            tracing::error!(user_id = %id, error = %e, "Failed to persist user update");
            e
        })?;

        if !user.account.is_verified() {
            let event = EmailUnverifiedEvent::new(&user);
            if let Err(e) = self.event_publisher.publish_email_unverified(&event).await {
                tracing::error!(
                    "Failed to publish {} event for user {}: {}",
                    EmailUnverifiedEvent::TOPIC,
                    user.id,
                    e
                );
            }
        }

        Ok(user)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), UserError> {
        let mut user = self.repository.find_by_email(email).await?.ok_or_else(|| {
            tracing::warn!(email, "Password reset requested for unknown email");
            UserError::NotFound(format!("user with email '{}' not found", email))
        })?;

        user.request_password_reset();

        let user = self.repository.save(user).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist one-time password");
            e
        })?;

        let event = PasswordResetRequestedEvent::new(&user);
        if let Err(e) = self
            .event_publisher
            .publish_password_reset_requested(&event)
            .await
        {
            tracing::error!(
                "Failed to publish {} event for user {}: {}",
                PasswordResetRequestedEvent::TOPIC,
                user.id,
                e
            );
        }

        Ok(())
    }

    async fn reset_password(&self, otp: &str, new_password: &str) -> Result<(), UserError> {
        let user = self
            .repository
            .find_by_one_time_password(otp)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Password reset with unknown or consumed one-time password");
                UserError::NotFound("no active reset for that one-time password".to_string())
            })?;

        let otp = otp.to_string();
        let new_password = new_password.to_string();
        let (user, result) = self
            .on_hashing_pool(move |hasher| {
                let mut user = user;
                let result = user.confirm_password_reset(&otp, &new_password, hasher);
                (user, result)
            })
            .await?;

        result.map_err(|e| {
            tracing::warn!(user_id = %user.id, error = %e, "Password reset rejected");
            UserError::from(e)
        })?;

        self.repository.save(user).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist password reset");
            e
        })?;

        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<(), UserError> {
        let Some(mut user) = self.repository.find_by_verification_token(token).await? else {
            // Token already consumed or never existed. Verification links are
            // one-shot and may be clicked twice, so this is a benign no-op.
            tracing::debug!("Verification token matched no user");
            return Ok(());
        };

        user.verify_email();

        self.repository.save(user).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist email verification");
            e
        })?;

        Ok(())
    }
}
