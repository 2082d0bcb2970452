use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Session authenticator issuing and validating bearer token pairs.
///
/// Mints a short-lived access token (carrying subject and display name) and a
/// longer-lived refresh token (subject only), both signed with the same
/// server secret. Validation resolves an inbound bearer proof back to its
/// subject.
///
/// Refresh tokens are not revocation-tracked: a leaked refresh token stays
/// valid until natural expiry.
pub struct Authenticator {
    jwt_handler: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// An access/refresh token pair minted for one user.
pub struct TokenPair {
    /// Short-lived token presented on every authenticated request
    pub access_token: String,
    /// Longer-lived token used only to mint fresh pairs
    pub refresh_token: String,
}

/// Authentication proof rejection.
///
/// Malformed proof, bad signature, and expired timestamp all collapse into
/// this single variant so callers cannot learn which check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("unauthorized")]
    Unauthorized,
}

impl Authenticator {
    const ACCESS_TTL_MINUTES: i64 = 15;
    const REFRESH_TTL_HOURS: i64 = 24;

    /// Create a new authenticator with default token lifetimes
    /// (15-minute access, 24-hour refresh).
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_ttls(
            jwt_secret,
            Duration::minutes(Self::ACCESS_TTL_MINUTES),
            Duration::hours(Self::REFRESH_TTL_HOURS),
        )
    }

    /// Create a new authenticator with explicit token lifetimes.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `access_ttl` - Access token lifetime
    /// * `refresh_ttl` - Refresh token lifetime
    pub fn with_ttls(jwt_secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(jwt_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Mint an access/refresh token pair for a user.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `display_name` - Name carried in the access token
    ///
    /// # Errors
    /// * `JwtError` - Token encoding failed
    pub fn issue_token_pair(
        &self,
        subject: &str,
        display_name: &str,
    ) -> Result<TokenPair, JwtError> {
        let access_claims = Claims::access(subject, display_name, self.access_ttl);
        let refresh_claims = Claims::refresh(subject, self.refresh_ttl);

        Ok(TokenPair {
            access_token: self.jwt_handler.encode(&access_claims)?,
            refresh_token: self.jwt_handler.encode(&refresh_claims)?,
        })
    }

    /// Resolve an inbound bearer proof to its subject.
    ///
    /// # Arguments
    /// * `proof` - Bearer token presented by the request
    ///
    /// # Returns
    /// The subject (user identifier) the token was minted for
    ///
    /// # Errors
    /// * `Unauthorized` - Proof is malformed, expired, or carries a bad signature
    pub fn authenticate(&self, proof: &str) -> Result<String, AuthenticationError> {
        self.decode_subject(proof)
    }

    /// Validate a refresh token and return its subject.
    ///
    /// The caller is expected to re-resolve the user before minting a new
    /// pair, so deleted accounts cannot refresh indefinitely.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is malformed, expired, or carries a bad signature
    pub fn verify_refresh(&self, refresh_token: &str) -> Result<String, AuthenticationError> {
        self.decode_subject(refresh_token)
    }

    fn decode_subject(&self, token: &str) -> Result<String, AuthenticationError> {
        let claims: Claims = self
            .jwt_handler
            .decode(token)
            .map_err(|_| AuthenticationError::Unauthorized)?;

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_authenticate() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let pair = authenticator
            .issue_token_pair("user123", "alice")
            .expect("Failed to issue token pair");

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());

        let subject = authenticator
            .authenticate(&pair.access_token)
            .expect("Access token should authenticate");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_refresh_resolves_original_subject() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let pair = authenticator
            .issue_token_pair("user123", "alice")
            .expect("Failed to issue token pair");

        let subject = authenticator
            .verify_refresh(&pair.refresh_token)
            .expect("Refresh token should verify");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let authenticator = Authenticator::with_ttls(
            b"test_secret_key_at_least_32_bytes!",
            Duration::minutes(-5),
            Duration::hours(24),
        );

        let pair = authenticator
            .issue_token_pair("user123", "alice")
            .expect("Failed to issue token pair");

        let result = authenticator.authenticate(&pair.access_token);
        assert!(matches!(result, Err(AuthenticationError::Unauthorized)));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = Authenticator::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = Authenticator::new(b"secret2_at_least_32_bytes_long_key!");

        let pair = issuer
            .issue_token_pair("user123", "alice")
            .expect("Failed to issue token pair");

        assert!(matches!(
            verifier.authenticate(&pair.access_token),
            Err(AuthenticationError::Unauthorized)
        ));
        assert!(matches!(
            verifier.verify_refresh(&pair.refresh_token),
            Err(AuthenticationError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_proof_rejected() {
        let authenticator = Authenticator::new(b"test_secret_key_at_least_32_bytes!");

        let result = authenticator.authenticate("not.a.token");
        assert!(matches!(result, Err(AuthenticationError::Unauthorized)));
    }
}
