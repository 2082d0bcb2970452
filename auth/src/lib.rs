//! Authentication infrastructure library
//!
//! Provides reusable credential primitives for services:
//! - Password hashing (Argon2id, PHC string format)
//! - JWT token generation and validation with typed claims
//! - Session authentication via short-lived access / long-lived refresh tokens
//!
//! Each service defines its own domain traits and adapts these implementations.
//! Domain logic never lives here; this crate only knows about secrets, hashes,
//! and signed tokens.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Login: mint an access/refresh pair for an authenticated user
//! let pair = auth.issue_token_pair("user123", "alice").unwrap();
//!
//! // Subsequent requests: resolve the bearer proof back to a subject
//! let subject = auth.authenticate(&pair.access_token).unwrap();
//! assert_eq!(subject, "user123");
//!
//! // Later: trade the refresh token for the original subject
//! let subject = auth.verify_refresh(&pair.refresh_token).unwrap();
//! assert_eq!(subject, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
