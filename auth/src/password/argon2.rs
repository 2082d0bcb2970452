use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Password hashing implementation.
///
/// Uses Argon2id with a fresh random 16-byte salt per hash. The cost
/// parameters are baked into the PHC-format output
/// (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<digest>`), so verification
/// always re-derives with the parameters a hash was created with. Raising
/// the costs later leaves previously stored hashes verifiable.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    const MEMORY_KIB: u32 = 64 * 1024;
    const ITERATIONS: u32 = 1;
    const PARALLELISM: u32 = 4;
    const OUTPUT_LEN: usize = 32;

    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance with fixed cost parameters (64 MiB memory,
    /// 1 iteration, 4 lanes, 32-byte digest)
    pub fn new() -> Self {
        let params = Params::new(
            Self::MEMORY_KIB,
            Self::ITERATIONS,
            Self::PARALLELISM,
            Some(Self::OUTPUT_LEN),
        )
        .unwrap_or_else(|_| Params::default());

        Self { params }
    }

    fn context(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext secret securely.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and digest)
    ///
    /// # Errors
    /// * `HashingFailed` - Random salt generation or key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.context()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a secret against a stored hash.
    ///
    /// Re-derives the digest using the salt and cost parameters embedded in
    /// `hash`, then compares digests in constant time (delegated to the
    /// argon2 crate's verifier).
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Hash cannot be parsed into its component fields
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self
            .context()
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let first = hasher.hash(password).expect("Failed to hash password");
        let second = hasher.hash(password).expect("Failed to hash password");

        // Different salts produce different encodings, but both still verify
        assert_ne!(first, second);
        assert!(hasher.verify(password, &first).unwrap());
        assert!(hasher.verify(password, &second).unwrap());
    }

    #[test]
    fn test_hash_embeds_cost_parameters() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("password").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$v=19$m=65536,t=1,p=4$"));
    }

    #[test]
    fn test_verify_hash_with_foreign_parameters() {
        // A hash created under different costs verifies against its own
        // embedded parameters, not ours.
        let hasher = PasswordHasher::new();
        let salt = SaltString::generate(&mut OsRng);
        let foreign = Argon2::default()
            .hash_password(b"password", &salt)
            .unwrap()
            .to_string();

        assert!(hasher.verify("password", &foreign).unwrap());
        assert!(!hasher.verify("other", &foreign).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(matches!(result, Err(PasswordError::MalformedHash(_))));
    }
}
