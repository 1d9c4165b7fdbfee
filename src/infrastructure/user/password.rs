//! Password hashing utilities using Argon2

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::config::PasswordConfig;
use crate::domain::{DomainError, HashedPassword};

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh salt
    fn hash(&self, password: &str) -> Result<HashedPassword, DomainError>;

    /// Verify a password against a stored hash.
    ///
    /// Errors only when the stored hash cannot be parsed.
    fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, DomainError>;
}

/// Argon2id password hasher with a configurable work factor
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    config: PasswordConfig,
}

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    fn argon2(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(
            self.config.memory_cost_kib,
            self.config.time_cost,
            self.config.parallelism,
            None,
        )
        .map_err(|e| DomainError::hash(format!("Invalid cost factor: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(PasswordConfig::default())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| HashedPassword::from_stored(hash.to_string()))
            .map_err(|e| DomainError::hash(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash = PasswordHash::new(hash.as_str())
            .map_err(|e| DomainError::hash(format!("Stored password hash is malformed: {}", e)))?;

        // Parameters come from the PHC string, so hashes made under an older
        // cost factor keep verifying. The digest comparison is constant-time.
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Salted hash generation and verification.
///
/// The async methods run the hasher on tokio's blocking pool so they never
/// stall the calling task's worker thread. Overlapping calls may complete in
/// any order.
pub struct PasswordService<H: PasswordHasher> {
    hasher: Arc<H>,
}

impl<H: PasswordHasher> Clone for PasswordService<H> {
    fn clone(&self) -> Self {
        Self {
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<H: PasswordHasher + 'static> PasswordService<H> {
    pub fn new(hasher: Arc<H>) -> Self {
        Self { hasher }
    }

    /// Hash `plaintext` with a fresh salt
    pub async fn generate_password(&self, plaintext: &str) -> Result<HashedPassword, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| DomainError::internal(format!("Hashing task failed: {}", e)))?
    }

    /// Check `plaintext` against `hash` on the calling thread.
    ///
    /// A missing or empty hash (account without a password, e.g. OAuth-only)
    /// is `Ok(false)`.
    pub fn verify_password_blocking(
        &self,
        plaintext: &str,
        hash: Option<&HashedPassword>,
    ) -> Result<bool, DomainError> {
        match hash {
            Some(hash) if !hash.is_empty() => self.hasher.verify(plaintext, hash),
            _ => Ok(false),
        }
    }

    /// Check `plaintext` against `hash` without blocking the caller
    pub async fn verify_password(
        &self,
        plaintext: &str,
        hash: Option<&HashedPassword>,
    ) -> Result<bool, DomainError> {
        let hash = match hash {
            Some(hash) if !hash.is_empty() => hash.clone(),
            _ => return Ok(false),
        };

        let hasher = Arc::clone(&self.hasher);
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Verification task failed: {}", e)))?
    }
}
