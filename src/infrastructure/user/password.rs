//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::config::PasswordHashingConfig;
use crate::domain::user::PasswordDigest;
use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Derive a salted one-way digest from a password
    fn hash(&self, password: &str) -> Result<PasswordDigest, DomainError>;

    /// Verify a password against a digest; a malformed or empty digest never matches
    fn verify(&self, password: &str, digest: &PasswordDigest) -> bool;
}

/// Argon2id-based password hasher
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with Argon2's default cost parameters
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher with the configured cost parameters
    pub fn from_config(config: &PasswordHashingConfig) -> Result<Self, DomainError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| {
                DomainError::configuration(format!("Invalid Argon2 parameters: {}", e))
            })?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordDigest, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordDigest::new(hash.to_string()))
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, digest: &PasswordDigest) -> bool {
        if digest.is_empty() {
            return false;
        }

        let parsed_hash = match PasswordHash::new(digest.as_str()) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters are read from the digest itself, so digests made under
        // older cost settings still verify.
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
