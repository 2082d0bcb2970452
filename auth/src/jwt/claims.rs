use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Typed JWT claims.
///
/// Every token this crate issues carries a subject, an issued-at timestamp,
/// and an expiry. Access tokens additionally carry the user's display name
/// for downstream handlers; refresh tokens carry the subject only. The shape
/// is validated once at decode time, so handlers never poke at untyped maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Display name, present on access tokens only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create access-token claims for a user.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `name` - Display name carried in the token
    /// * `ttl` - Time until the token expires
    pub fn access(subject: impl ToString, name: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            name: Some(name.to_string()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Create refresh-token claims for a user.
    ///
    /// Carries the subject and expiry only.
    pub fn refresh(subject: impl ToString, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: subject.to_string(),
            name: None,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Check if the token is expired at the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims() {
        let claims = Claims::access("user123", "alice", Duration::minutes(15));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.name.as_deref(), Some("alice"));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_refresh_claims() {
        let claims = Claims::refresh("user123", Duration::hours(24));

        assert_eq!(claims.sub, "user123");
        assert!(claims.name.is_none());
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = Claims::refresh("user123", Duration::hours(1));
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }
}
