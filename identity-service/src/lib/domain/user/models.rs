use std::fmt;
use std::str::FromStr;

use auth::PasswordHasher;
use chrono::DateTime;
use chrono::Utc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::user::errors::AccountError;
use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;
use crate::user::errors::UserNameError;

/// User aggregate entity.
///
/// Represents a designer, tester, or publisher using the platform. The
/// credential state lives in the embedded [`Account`]; profile fields live
/// here.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: UserName,
    pub pronouns: String,
    pub account: Account,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given name, email, and password.
    ///
    /// The account starts unverified with a fresh verification token.
    ///
    /// # Errors
    /// * `WeakPassword` - Password shorter than the minimum length
    /// * `Password` - Hashing failed
    pub fn new(
        name: UserName,
        email: EmailAddress,
        password: &str,
        hasher: &PasswordHasher,
    ) -> Result<Self, AccountError> {
        let account = Account::new(email, password, hasher)?;

        Ok(Self {
            id: UserId::new(),
            name,
            pronouns: String::new(),
            account,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a user from stored state. Used by repositories only.
    pub fn from_stored(
        id: UserId,
        name: UserName,
        pronouns: String,
        account: Account,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            pronouns,
            account,
            created_at,
        }
    }

    /// Update the user's name. Equal names are a no-op.
    pub fn rename(&mut self, new_name: UserName) {
        if self.name != new_name {
            self.name = new_name;
        }
    }

    /// Update the user's pronouns. Empty input means "leave unchanged".
    pub fn set_pronouns(&mut self, new_pronouns: &str) {
        if !new_pronouns.is_empty() {
            self.pronouns = new_pronouns.to_string();
        }
    }

    /// Check a candidate password against the stored credential.
    pub fn valid_password(
        &self,
        candidate: &str,
        hasher: &PasswordHasher,
    ) -> Result<bool, AccountError> {
        self.account.valid_password(candidate, hasher)
    }

    /// Change the user's email, resetting verification state.
    pub fn change_email(&mut self, new_email: EmailAddress) {
        self.account.change_email(new_email);
    }

    /// Change the user's password, requiring proof of the current one.
    pub fn change_password(
        &mut self,
        new_password: &str,
        old_password: &str,
        hasher: &PasswordHasher,
    ) -> Result<(), AccountError> {
        self.account.change_password(new_password, old_password, hasher)
    }

    /// Mark the user's email as verified.
    pub fn verify_email(&mut self) {
        self.account.verify_email();
    }

    /// Begin a password reset, returning the one-time password to deliver
    /// out-of-band.
    pub fn request_password_reset(&mut self) -> String {
        self.account.request_password_reset()
    }

    /// Complete a password reset by consuming the one-time password.
    pub fn confirm_password_reset(
        &mut self,
        otp: &str,
        new_password: &str,
        hasher: &PasswordHasher,
    ) -> Result<(), AccountError> {
        self.account.confirm_password_reset(otp, new_password, hasher)
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name is 2-100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 2 characters
    /// * `TooLong` - Name longer than 100 characters
    pub fn new(name: String) -> Result<Self, UserNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UserNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Credential state embedded in the user aggregate.
///
/// Invariants maintained by the transition methods:
/// - `password_hash` is never empty once construction succeeds
/// - `verification_token` is empty exactly when `verified` is true
///   (the reset flow sets `verified` without touching the token)
/// - a consumed one-time password is cleared and cannot be replayed
#[derive(Debug, Clone)]
pub struct Account {
    email: EmailAddress,
    password_hash: String,
    verified: bool,
    verification_token: String,
    one_time_password: String,
}

impl Account {
    const MIN_PASSWORD_LENGTH: usize = 10;

    /// Create a new unverified account with a hashed password and a fresh
    /// verification token.
    ///
    /// # Errors
    /// * `WeakPassword` - Password shorter than 10 characters
    /// * `Password` - Hashing failed
    pub fn new(
        email: EmailAddress,
        password: &str,
        hasher: &PasswordHasher,
    ) -> Result<Self, AccountError> {
        Self::check_password_strength(password)?;

        Ok(Self {
            email,
            password_hash: hasher.hash(password)?,
            verified: false,
            verification_token: Uuid::new_v4().to_string(),
            one_time_password: String::new(),
        })
    }

    /// Rebuild an account from stored state. Used by repositories only.
    pub fn from_stored(
        email: EmailAddress,
        password_hash: String,
        verified: bool,
        verification_token: String,
        one_time_password: String,
    ) -> Self {
        Self {
            email,
            password_hash,
            verified,
            verification_token,
            one_time_password,
        }
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn verification_token(&self) -> &str {
        &self.verification_token
    }

    pub fn one_time_password(&self) -> &str {
        &self.one_time_password
    }

    /// Check a candidate password against the stored hash.
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    pub fn valid_password(
        &self,
        candidate: &str,
        hasher: &PasswordHasher,
    ) -> Result<bool, AccountError> {
        Ok(hasher.verify(candidate, &self.password_hash)?)
    }

    /// Mark the email as verified and clear the verification token.
    /// Idempotent.
    pub fn verify_email(&mut self) {
        self.verified = true;
        self.verification_token.clear();
    }

    /// Replace the email address. Equal addresses are a no-op; otherwise the
    /// account drops back to unverified with a fresh verification token.
    pub fn change_email(&mut self, new_email: EmailAddress) {
        if self.email == new_email {
            return;
        }

        self.email = new_email;
        self.verified = false;
        self.verification_token = Uuid::new_v4().to_string();
    }

    /// Replace the password, requiring proof of the current one.
    ///
    /// Identity was already proven via the old password, so the account
    /// stays verified.
    ///
    /// # Errors
    /// * `PasswordMismatch` - Old password does not match
    /// * `WeakPassword` - New password shorter than 10 characters
    /// * `Password` - Hashing failed or stored hash malformed
    pub fn change_password(
        &mut self,
        new_password: &str,
        old_password: &str,
        hasher: &PasswordHasher,
    ) -> Result<(), AccountError> {
        if !self.valid_password(old_password, hasher)? {
            return Err(AccountError::PasswordMismatch);
        }

        Self::check_password_strength(new_password)?;
        self.password_hash = hasher.hash(new_password)?;
        self.verified = true;

        Ok(())
    }

    /// Assign a new one-time password for a reset window and return it for
    /// out-of-band delivery. Does not change the verified state.
    pub fn request_password_reset(&mut self) -> String {
        self.one_time_password = Uuid::new_v4().to_string();
        self.one_time_password.clone()
    }

    /// Consume the one-time password and replace the stored hash.
    ///
    /// A successful reset proves mailbox ownership, so the account is also
    /// marked verified. The one-time password is cleared and cannot be
    /// replayed.
    ///
    /// # Errors
    /// * `OneTimePasswordIncorrect` - No active reset window, or the provided
    ///   value does not match
    /// * `WeakPassword` - New password shorter than 10 characters
    /// * `Password` - Hashing failed
    pub fn confirm_password_reset(
        &mut self,
        otp: &str,
        new_password: &str,
        hasher: &PasswordHasher,
    ) -> Result<(), AccountError> {
        if self.one_time_password.is_empty() {
            return Err(AccountError::OneTimePasswordIncorrect);
        }

        // Guards a bearer secret, so compare in constant time
        let matches: bool = otp
            .as_bytes()
            .ct_eq(self.one_time_password.as_bytes())
            .into();
        if !matches {
            return Err(AccountError::OneTimePasswordIncorrect);
        }

        Self::check_password_strength(new_password)?;
        self.password_hash = hasher.hash(new_password)?;
        self.one_time_password.clear();
        self.verified = true;

        Ok(())
    }

    fn check_password_strength(password: &str) -> Result<(), AccountError> {
        let length = password.chars().count();
        if length < Self::MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword {
                min: Self::MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }

        Ok(())
    }
}

/// Command to create a new user with domain types
#[derive(Debug)]
pub struct SignupCommand {
    pub name: UserName,
    pub email: EmailAddress,
    pub password: String,
}

impl SignupCommand {
    pub fn new(name: UserName, email: EmailAddress, password: String) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Command to update an existing user with optional validated fields.
///
/// All fields are optional to support partial updates; callers signal "leave
/// unchanged" by omitting a field (empty strings at the HTTP boundary become
/// `None` before they reach the domain). A password change is attempted only
/// when both the old and the new password are present.
#[derive(Debug, Default)]
pub struct UpdateUserCommand {
    pub name: Option<UserName>,
    pub email: Option<EmailAddress>,
    pub new_password: Option<String>,
    pub old_password: Option<String>,
    pub pronouns: Option<String>,
}

/// Audit record for a login attempt, successful or not.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub email: String,
    pub ip: String,
    pub successful: bool,
    pub created_at: DateTime<Utc>,
}

impl LoginAttempt {
    /// Create the log entry for an attempt. It still needs to be persisted.
    pub fn record(email: &str, ip: &str, successful: bool) -> Self {
        Self {
            email: email.to_string(),
            ip: ip.to_string(),
            successful,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new()
    }

    fn account() -> Account {
        Account::new(
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            "LongEnoughPass1",
            &hasher(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_account_starts_unverified() {
        let account = account();

        assert!(!account.is_verified());
        assert!(!account.verification_token().is_empty());
        assert!(account.one_time_password().is_empty());
        assert!(account.password_hash().starts_with("$argon2id$"));
    }

    #[test]
    fn test_new_account_rejects_weak_password() {
        let result = Account::new(
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            "short",
            &hasher(),
        );

        assert!(matches!(
            result,
            Err(AccountError::WeakPassword { min: 10, actual: 5 })
        ));
    }

    #[test]
    fn test_verify_email_is_idempotent() {
        let mut account = account();

        account.verify_email();
        assert!(account.is_verified());
        assert!(account.verification_token().is_empty());

        account.verify_email();
        assert!(account.is_verified());
    }

    #[test]
    fn test_change_email_resets_verification() {
        let mut account = account();
        account.verify_email();
        let old_token = account.verification_token().to_string();

        account.change_email(EmailAddress::new("new@example.com".to_string()).unwrap());

        assert_eq!(account.email().as_str(), "new@example.com");
        assert!(!account.is_verified());
        assert!(!account.verification_token().is_empty());
        assert_ne!(account.verification_token(), old_token);
    }

    #[test]
    fn test_change_email_to_same_address_is_noop() {
        let mut account = account();
        account.verify_email();

        account.change_email(EmailAddress::new("ada@example.com".to_string()).unwrap());

        assert!(account.is_verified());
    }

    #[test]
    fn test_change_password_requires_old_password() {
        let h = hasher();
        let mut account = account();
        let old_hash = account.password_hash().to_string();

        let result = account.change_password("AnotherLongPass1", "wrong-old-password", &h);

        assert!(matches!(result, Err(AccountError::PasswordMismatch)));
        assert_eq!(account.password_hash(), old_hash);
    }

    #[test]
    fn test_change_password_keeps_verified() {
        let h = hasher();
        let mut account = account();
        account.verify_email();

        account
            .change_password("AnotherLongPass1", "LongEnoughPass1", &h)
            .unwrap();

        assert!(account.is_verified());
        assert!(account.valid_password("AnotherLongPass1", &h).unwrap());
        assert!(!account.valid_password("LongEnoughPass1", &h).unwrap());
    }

    #[test]
    fn test_password_reset_flow() {
        let h = hasher();
        let mut account = account();

        let otp = account.request_password_reset();
        assert!(!otp.is_empty());
        assert!(!account.is_verified()); // Requesting a reset changes nothing else

        account
            .confirm_password_reset(&otp, "BrandNewPass123", &h)
            .unwrap();

        assert!(account.valid_password("BrandNewPass123", &h).unwrap());
        assert!(account.one_time_password().is_empty());
        // A successful reset proves mailbox ownership
        assert!(account.is_verified());
    }

    #[test]
    fn test_password_reset_cannot_be_replayed() {
        let h = hasher();
        let mut account = account();

        let otp = account.request_password_reset();
        account
            .confirm_password_reset(&otp, "BrandNewPass123", &h)
            .unwrap();

        let result = account.confirm_password_reset(&otp, "YetAnotherPass456", &h);
        assert!(matches!(result, Err(AccountError::OneTimePasswordIncorrect)));
        assert!(account.valid_password("BrandNewPass123", &h).unwrap());
    }

    #[test]
    fn test_password_reset_rejects_wrong_otp() {
        let h = hasher();
        let mut account = account();
        let _otp = account.request_password_reset();

        let result = account.confirm_password_reset("not-the-otp", "BrandNewPass123", &h);
        assert!(matches!(result, Err(AccountError::OneTimePasswordIncorrect)));
    }

    #[test]
    fn test_rename_and_pronouns() {
        let mut user = User::new(
            UserName::new("Ada".to_string()).unwrap(),
            EmailAddress::new("ada@example.com".to_string()).unwrap(),
            "LongEnoughPass1",
            &hasher(),
        )
        .unwrap();

        user.rename(UserName::new("Ada Lovelace".to_string()).unwrap());
        assert_eq!(user.name.as_str(), "Ada Lovelace");

        user.set_pronouns("she/her");
        assert_eq!(user.pronouns, "she/her");

        user.set_pronouns("");
        assert_eq!(user.pronouns, "she/her");
    }

    #[test]
    fn test_user_name_length_limits() {
        assert!(matches!(
            UserName::new("A".to_string()),
            Err(UserNameError::TooShort { .. })
        ));
        assert!(UserName::new("Ad".to_string()).is_ok());
        assert!(matches!(
            UserName::new("x".repeat(101)),
            Err(UserNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("ada@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_user_id_parsing() {
        let id = UserId::new();
        let parsed = UserId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        assert!(UserId::from_string("not-a-uuid").is_err());
    }
}
